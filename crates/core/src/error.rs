//! 에러 타입 — 도메인별 에러 정의

/// Accesswatch 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum AccesswatchError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 파이프라인 처리 에러
    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 파이프라인 처리 에러
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// 이미 실행 중인 파이프라인을 다시 시작함
    #[error("pipeline already running")]
    AlreadyRunning,

    /// 실행 중이 아닌 파이프라인을 정지함
    #[error("pipeline not running")]
    NotRunning,

    /// 파이프라인 초기화 실패
    #[error("pipeline init failed: {0}")]
    InitFailed(String),

    /// 외부 로그 프로세스 기동 실패
    #[error("log source spawn failed: {0}")]
    SourceSpawn(String),
}

/// 이벤트 싱크 전달 에러
///
/// 싱크 호출은 fire-and-forget 계약입니다. 호출자는 이 에러를
/// 전파하지 않고 로컬에서 기록 후 버립니다.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// 싱크로의 전달 실패
    #[error("sink delivery failed: {0}")]
    Delivery(String),
}

/// UID 해석 에러
///
/// 해석 실패는 귀속 전략의 폴백 신호로만 쓰이며 전파되지 않습니다.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// UID 조회 실패
    #[error("uid lookup failed: {0}")]
    Lookup(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::InvalidValue {
            field: "monitor.rate_window_ms".to_owned(),
            reason: "must be at least 1".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("monitor.rate_window_ms"));
        assert!(msg.contains("at least 1"));
    }

    #[test]
    fn pipeline_error_wraps_into_top_level() {
        let err: AccesswatchError = PipelineError::AlreadyRunning.into();
        assert!(matches!(err, AccesswatchError::Pipeline(_)));
    }

    #[test]
    fn io_error_wraps_into_top_level() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: AccesswatchError = io.into();
        assert!(err.to_string().contains("pipe closed"));
    }

    #[test]
    fn sink_error_display() {
        let err = SinkError::Delivery("receiver gone".to_owned());
        assert!(err.to_string().contains("receiver gone"));
    }
}
