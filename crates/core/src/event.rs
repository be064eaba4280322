//! 이벤트 시스템 — 탐지 결과를 담는 기본 단위
//!
//! 탐지 파이프라인이 생성하는 두 이벤트 타입을 정의합니다.
//! [`AccessEvent`]는 리소스 접근 한 건의 포맷된 로그 레코드이고,
//! [`AlertEvent`]는 속도 제한을 통과한 사용자 알림입니다.
//! [`EventMetadata`]는 모든 이벤트에 공통으로 포함되는 추적 정보입니다.

use std::fmt;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::types::{Category, EventKind};

// --- 모듈명 상수 ---

/// 탐지 파이프라인 모듈명
pub const MODULE_DETECT: &str = "detect";
/// 데몬 모듈명
pub const MODULE_DAEMON: &str = "daemon";

// --- 이벤트 타입 상수 ---

/// 접근 이벤트 타입
pub const EVENT_TYPE_ACCESS: &str = "access";
/// 알림 이벤트 타입
pub const EVENT_TYPE_ALERT: &str = "alert";

/// 이벤트 메타데이터 — 모든 이벤트에 공통으로 포함되는 추적 정보
///
/// 각 이벤트의 발생 시각, 생성 모듈, 추적 ID를 담고 있어
/// 이벤트 흐름을 추적하고 디버깅할 수 있습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMetadata {
    /// 이벤트 발생 시각
    pub timestamp: SystemTime,
    /// 이벤트를 생성한 모듈명 (예: "detect")
    pub source_module: String,
    /// 추적 ID — 같은 흐름의 이벤트를 연결합니다
    pub trace_id: String,
}

impl EventMetadata {
    /// 기존 trace_id를 사용하여 새 메타데이터를 생성합니다.
    pub fn new(source_module: impl Into<String>, trace_id: impl Into<String>) -> Self {
        Self {
            timestamp: SystemTime::now(),
            source_module: source_module.into(),
            trace_id: trace_id.into(),
        }
    }

    /// 새로운 UUID v4 trace_id를 생성하여 메타데이터를 만듭니다.
    ///
    /// 새로운 이벤트 체인의 시작점에서 사용합니다.
    pub fn with_new_trace(source_module: impl Into<String>) -> Self {
        Self {
            timestamp: SystemTime::now(),
            source_module: source_module.into(),
            trace_id: uuid::Uuid::new_v4().to_string(),
        }
    }
}

impl fmt::Display for EventMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] source={} trace={}",
            unix_timestamp_str(self.timestamp),
            self.source_module,
            self.trace_id,
        )
    }
}

/// 모든 이벤트가 구현해야 하는 기본 trait
///
/// `Send + Sync + 'static` 바운드로 스레드 간 안전한 전달을 보장합니다.
pub trait Event: Send + Sync + 'static {
    /// 이벤트 고유 ID (UUID v4)
    fn event_id(&self) -> &str;

    /// 이벤트 메타데이터 (timestamp, source_module, trace_id)
    fn metadata(&self) -> &EventMetadata;

    /// 이벤트 타입명 (로깅 및 라우팅에 사용)
    fn event_type(&self) -> &str;
}

/// 리소스 접근 이벤트
///
/// 탐지기가 분류·귀속·속도 제한을 통과시킨 로그 라인 한 건을 나타냅니다.
/// `message`는 싱크의 `on_line`으로 전달되는 포맷된 레코드입니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessEvent {
    /// 이벤트 고유 ID
    pub id: String,
    /// 이벤트 메타데이터
    pub metadata: EventMetadata,
    /// 탐지 카테고리
    pub category: Category,
    /// 책임 패키지 (귀속 실패 시 "unknown")
    pub package: String,
    /// 접근 이벤트 종류
    pub kind: EventKind,
    /// 포맷된 로그 레코드 (아이콘 + 패키지 + 종류)
    pub message: String,
}

impl AccessEvent {
    /// 새 접근 이벤트를 생성합니다.
    ///
    /// 포맷된 레코드는 원본 구현과 동일하게
    /// `"{icon} {package} accessed {label} ({kind})"` 형태입니다.
    pub fn new(category: Category, package: impl Into<String>, kind: EventKind) -> Self {
        let package = package.into();
        let message = format!(
            "{} {} accessed {} ({})",
            category.icon(),
            package,
            category.label(),
            kind.name(),
        );
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            metadata: EventMetadata::with_new_trace(MODULE_DETECT),
            category,
            package,
            kind,
            message,
        }
    }
}

impl Event for AccessEvent {
    fn event_id(&self) -> &str {
        &self.id
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }

    fn event_type(&self) -> &str {
        EVENT_TYPE_ACCESS
    }
}

impl fmt::Display for AccessEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AccessEvent[{}] category={} package={} kind={}",
            &self.id[..8.min(self.id.len())],
            self.category,
            self.package,
            self.kind,
        )
    }
}

/// 사용자 알림 이벤트
///
/// 이벤트 속도 제한과 알림 스로틀을 모두 통과한 경우에만 생성됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertEvent {
    /// 이벤트 고유 ID
    pub id: String,
    /// 이벤트 메타데이터
    pub metadata: EventMetadata,
    /// 알림 제목
    pub title: String,
    /// 알림 본문
    pub message: String,
    /// 알림을 발생시킨 카테고리
    pub category: Category,
}

impl AlertEvent {
    /// 새로운 trace를 시작하는 알림 이벤트를 생성합니다.
    pub fn new(category: Category, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            metadata: EventMetadata::with_new_trace(MODULE_DETECT),
            title: title.into(),
            message: message.into(),
            category,
        }
    }

    /// 기존 trace에 연결된 알림 이벤트를 생성합니다.
    ///
    /// 같은 로그 라인에서 나온 `AccessEvent`와 추적 ID를 공유할 때 사용합니다.
    pub fn with_trace(
        category: Category,
        title: impl Into<String>,
        message: impl Into<String>,
        trace_id: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            metadata: EventMetadata::new(MODULE_DETECT, trace_id),
            title: title.into(),
            message: message.into(),
            category,
        }
    }
}

impl Event for AlertEvent {
    fn event_id(&self) -> &str {
        &self.id
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }

    fn event_type(&self) -> &str {
        EVENT_TYPE_ALERT
    }
}

impl fmt::Display for AlertEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AlertEvent[{}] category={} title={}",
            &self.id[..8.min(self.id.len())],
            self.category,
            self.title,
        )
    }
}

/// SystemTime을 사람이 읽을 수 있는 형태로 변환합니다.
fn unix_timestamp_str(time: SystemTime) -> String {
    match time.duration_since(SystemTime::UNIX_EPOCH) {
        Ok(duration) => {
            let secs = duration.as_secs();
            format!("{secs}")
        }
        Err(_) => "unknown".to_owned(),
    }
}
