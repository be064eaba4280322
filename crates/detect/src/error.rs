//! 탐지 파이프라인 에러 타입
//!
//! [`DetectError`]는 탐지 파이프라인 내부에서 발생하는 모든 에러를 표현합니다.
//! `From<DetectError> for AccesswatchError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.

use accesswatch_core::error::{AccesswatchError, PipelineError};

/// 탐지 파이프라인 도메인 에러
///
/// 패턴 컴파일, 설정, 외부 프로세스 기동, 스트림 I/O 등
/// 파이프라인 내부의 모든 에러 상황을 포괄합니다.
#[derive(Debug, thiserror::Error)]
pub enum DetectError {
    /// 패턴 테이블의 정규식 컴파일 실패
    #[error("pattern compile error for kind '{kind}': {reason}")]
    Pattern {
        /// 문제가 된 이벤트 종류 이름
        kind: String,
        /// 컴파일 실패 사유
        reason: String,
    },

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// 외부 로그 프로세스 기동 실패
    #[error("log source spawn failed: command '{command}': {reason}")]
    SourceSpawn {
        /// 실행하려던 명령
        command: String,
        /// 실패 사유
        reason: String,
    },

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// 정규식 컴파일 에러
    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl From<DetectError> for AccesswatchError {
    fn from(err: DetectError) -> Self {
        let pipeline = match &err {
            DetectError::SourceSpawn { .. } => PipelineError::SourceSpawn(err.to_string()),
            _ => PipelineError::InitFailed(err.to_string()),
        };
        AccesswatchError::Pipeline(pipeline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_error_display() {
        let err = DetectError::Pattern {
            kind: "mediarecorder".to_owned(),
            reason: "unclosed group".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("mediarecorder"));
        assert!(msg.contains("unclosed group"));
    }

    #[test]
    fn source_spawn_error_display() {
        let err = DetectError::SourceSpawn {
            command: "logcat".to_owned(),
            reason: "No such file or directory".to_owned(),
        };
        assert!(err.to_string().contains("logcat"));
    }

    #[test]
    fn spawn_failure_maps_to_source_spawn_variant() {
        let err = DetectError::SourceSpawn {
            command: "logcat -v time".to_owned(),
            reason: "No such file or directory".to_owned(),
        };
        let top: AccesswatchError = err.into();
        assert!(matches!(
            top,
            AccesswatchError::Pipeline(PipelineError::SourceSpawn(_))
        ));
    }

    #[test]
    fn converts_to_accesswatch_error() {
        let err = DetectError::Config {
            field: "rate_window_ms".to_owned(),
            reason: "must be at least 1".to_owned(),
        };
        let top: AccesswatchError = err.into();
        assert!(matches!(top, AccesswatchError::Pipeline(_)));
    }
}
