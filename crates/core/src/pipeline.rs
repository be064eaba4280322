//! 파이프라인 trait — 모듈 확장 포인트 정의
//!
//! 탐지 코어가 소비하고 생산하는 경계 계약을 trait으로 정의합니다.
//! [`EventSink`]와 [`UidResolver`]는 외부 협력자가 구현하고,
//! [`Pipeline`]은 데몬이 모듈 수명주기를 관리하는 데 사용합니다.

use crate::error::{AccesswatchError, ResolveError, SinkError};

/// 파이프라인 헬스 상태
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// 정상 동작 중
    Healthy,
    /// 동작 중이나 주의 필요
    Degraded(String),
    /// 동작 불가
    Unhealthy(String),
}

impl HealthStatus {
    /// 정상 상태인지 확인합니다.
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }

    /// 동작 불가 상태인지 확인합니다.
    pub fn is_unhealthy(&self) -> bool {
        matches!(self, Self::Unhealthy(_))
    }
}

/// 모듈 수명주기 trait
///
/// 데몬은 각 모듈을 이 trait을 통해 동일한 방식으로 시작/정지합니다.
#[allow(async_fn_in_trait)]
pub trait Pipeline {
    /// 파이프라인을 시작합니다. 이미 실행 중이면 에러를 반환합니다.
    async fn start(&mut self) -> Result<(), AccesswatchError>;

    /// 파이프라인을 정지합니다. 실행 중이 아니면 에러를 반환합니다.
    async fn stop(&mut self) -> Result<(), AccesswatchError>;

    /// 현재 헬스 상태를 반환합니다.
    async fn health_check(&self) -> HealthStatus;
}

/// 이벤트 싱크 trait — 탐지 결과를 외부로 전달하는 경계
///
/// 두 연산 모두 one-way, fire-and-forget 계약입니다. 전달 실패는
/// 호출자가 로컬에서 버려야 하며, 탐지 파이프라인의 내부 상태나
/// 이후 라인 처리에 영향을 주어서는 안 됩니다.
pub trait EventSink: Send + Sync {
    /// 포맷된 접근 레코드 한 건을 전달합니다.
    fn on_line(&self, line: &str) -> Result<(), SinkError>;

    /// 사용자 알림 한 건을 전달합니다.
    fn on_alert(&self, title: &str, message: &str) -> Result<(), SinkError>;
}

/// UID 해석 trait — UID를 패키지 이름 목록으로 변환하는 선택적 능력
///
/// 패키지 귀속의 세 번째 전략에서 사용합니다. 에러와 빈 결과는 모두
/// "결과 없음"으로 취급되어 다음 전략으로 폴백합니다.
pub trait UidResolver: Send + Sync {
    /// UID에 연결된 패키지 이름 목록을 반환합니다 (비어 있을 수 있음).
    fn packages_for_uid(&self, uid: u32) -> Result<Vec<String>, ResolveError>;
}

/// 라인 탐지기 trait — 레지스트리가 탐지기를 디스패치하는 seam
///
/// 카테고리별 탐지기는 모두 이 trait을 구현합니다. `matches`는 값싼
/// 사전 필터이고, `handle`은 매칭된 라인의 분류/귀속/방출을 수행합니다.
pub trait LineDetector: Send + Sync {
    /// 안정적인 탐지기 식별자 (예: "microphone")
    fn id(&self) -> &str;

    /// 활성화 여부를 반환합니다.
    fn is_enabled(&self) -> bool;

    /// 탐지기를 활성화하거나 비활성화합니다. 다른 스레드에서 호출될 수 있습니다.
    fn set_enabled(&self, enabled: bool);

    /// 이 탐지기가 관심 있는 라인인지 판단합니다 (값싼 부분 문자열 검사).
    fn matches(&self, line: &str) -> bool;

    /// `matches`가 true를 반환한 라인을 처리합니다.
    fn handle(&self, line: &str);
}
