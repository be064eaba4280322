#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`classify`]: 순서 있는 패턴 테이블로 라인을 이벤트 종류로 분류
//! - [`attribute`]: 4단계 폴백 휴리스틱으로 책임 패키지 추정
//! - [`ratelimit`]: (패키지, 종류) 단위 슬라이딩 윈도우 속도 제한
//! - [`notify`]: 카테고리 단위 알림 스로틀
//! - [`detector`]: 카테고리별 탐지기 (분류/귀속/제한/방출 조합)
//! - [`registry`]: 탐지기 집합, 활성화 상태, 공유 윈도우 관리
//! - [`reader`]: 외부 로그 프로세스 기동 및 라인 읽기 루프
//! - [`sink`]: 교체 가능한 이벤트 싱크 핸들
//! - [`pipeline`]: 전체 파이프라인 오케스트레이션 (Pipeline trait 구현)
//! - [`config`]: 파이프라인 설정 (core 설정 확장)
//! - [`error`]: 도메인 에러 타입
//!
//! # 아키텍처
//!
//! ```text
//! LogStreamReader -> DetectorRegistry -> AccessDetector -> SinkHandle
//!      |                  |                  |
//!  외부 프로세스       순서 디스패치     분류 + 귀속 + 속도 제한
//! ```

pub mod config;
pub mod error;
pub mod pipeline;

pub mod attribute;
pub mod classify;
pub mod detector;
pub mod notify;
pub mod ratelimit;
pub mod reader;
pub mod registry;
pub mod sink;

// --- 주요 타입 re-export ---

// 파이프라인
pub use pipeline::{MonitorControl, MonitorPipeline, MonitorPipelineBuilder};

// 설정
pub use config::{MonitorConfig, MonitorConfigBuilder};

// 에러
pub use error::DetectError;

// 분류/귀속
pub use attribute::{PackageAttributor, UNKNOWN_PACKAGE};
pub use classify::PatternTable;

// 속도 제한/알림
pub use notify::NotificationThrottle;
pub use ratelimit::{EventRateLimiter, MonotonicClock, RateWindow};

// 탐지기/레지스트리
pub use detector::{AccessDetector, DetectorShared};
pub use registry::DetectorRegistry;

// 리더
pub use reader::{LogStreamReader, ReaderStatus};

// 싱크
pub use sink::SinkHandle;
