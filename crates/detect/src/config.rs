//! 탐지 파이프라인 설정
//!
//! [`MonitorConfig`]는 core의 [`MonitorSection`](accesswatch_core::config::MonitorSection)을
//! 기반으로 탐지 파이프라인 전용 설정을 제공합니다.
//!
//! # 사용 예시
//! ```ignore
//! use accesswatch_core::config::AccesswatchConfig;
//! use accesswatch_detect::config::MonitorConfig;
//!
//! let core_config = AccesswatchConfig::default();
//! let config = MonitorConfig::from_core(&core_config.monitor);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::DetectError;

/// 탐지기별 알림 스로틀 윈도우 기본값 (밀리초)
///
/// 이벤트 속도 제한 윈도우와 독립적인 고정 간격입니다.
pub const DEFAULT_NOTIFY_WINDOW_MS: u64 = 20_000;

/// 이벤트 속도 제한 윈도우 기본값 (밀리초)
pub const DEFAULT_RATE_WINDOW_MS: u64 = 10_000;

/// 탐지 파이프라인 설정
///
/// core의 `MonitorSection`에서 파생되며, 파이프라인 내부에서
/// 사용하는 추가 설정을 포함합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// 활성화 여부
    pub enabled: bool,
    /// 외부 로그 프로세스 명령
    pub source_command: String,
    /// 외부 로그 프로세스 인자
    pub source_args: Vec<String>,
    /// (패키지, 종류) 단위 속도 제한 윈도우 (밀리초)
    pub rate_window_ms: u64,
    /// 자기 식별 마커 — 이 문자열을 포함한 라인은 무시 (피드백 루프 차단)
    pub self_markers: Vec<String>,
    /// 시작 시 활성화할 탐지기 id 목록
    pub detectors: Vec<String>,

    // --- 확장 설정 (core에 없는 추가 필드) ---
    /// 탐지기별 알림 스로틀 윈도우 (밀리초)
    pub notify_window_ms: u64,
    /// 사용자 알림 제목
    pub alert_title: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            source_command: "logcat".to_owned(),
            source_args: vec!["-v".to_owned(), "time".to_owned()],
            rate_window_ms: DEFAULT_RATE_WINDOW_MS,
            self_markers: vec!["accesswatch".to_owned(), "io.accesswatch".to_owned()],
            detectors: vec![
                "location".to_owned(),
                "microphone".to_owned(),
                "camera".to_owned(),
            ],
            notify_window_ms: DEFAULT_NOTIFY_WINDOW_MS,
            alert_title: "Accesswatch Alert".to_owned(),
        }
    }
}

impl MonitorConfig {
    /// core의 `MonitorSection`에서 파이프라인 설정을 생성합니다.
    ///
    /// core 설정에 없는 확장 필드는 기본값이 적용됩니다.
    pub fn from_core(core: &accesswatch_core::config::MonitorSection) -> Self {
        Self {
            enabled: core.enabled,
            source_command: core.source_command.clone(),
            source_args: core.source_args.clone(),
            rate_window_ms: core.rate_window_ms,
            self_markers: core.self_markers.clone(),
            detectors: core.detectors.clone(),
            ..Self::default()
        }
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), DetectError> {
        if self.rate_window_ms == 0 {
            return Err(DetectError::Config {
                field: "rate_window_ms".to_owned(),
                reason: "must be at least 1".to_owned(),
            });
        }

        if self.notify_window_ms == 0 {
            return Err(DetectError::Config {
                field: "notify_window_ms".to_owned(),
                reason: "must be at least 1".to_owned(),
            });
        }

        if self.source_command.is_empty() {
            return Err(DetectError::Config {
                field: "source_command".to_owned(),
                reason: "must not be empty".to_owned(),
            });
        }

        let known = ["location", "microphone", "camera"];
        for id in &self.detectors {
            if !known.contains(&id.as_str()) {
                return Err(DetectError::Config {
                    field: "detectors".to_owned(),
                    reason: format!("unknown detector id '{}'", id),
                });
            }
        }

        Ok(())
    }
}

/// 탐지 파이프라인 설정 빌더
#[derive(Default)]
pub struct MonitorConfigBuilder {
    config: MonitorConfig,
}

impl MonitorConfigBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 외부 로그 프로세스 명령을 설정합니다.
    pub fn source_command(mut self, command: impl Into<String>) -> Self {
        self.config.source_command = command.into();
        self
    }

    /// 외부 로그 프로세스 인자를 설정합니다.
    pub fn source_args(mut self, args: Vec<String>) -> Self {
        self.config.source_args = args;
        self
    }

    /// 속도 제한 윈도우(밀리초)를 설정합니다.
    pub fn rate_window_ms(mut self, ms: u64) -> Self {
        self.config.rate_window_ms = ms;
        self
    }

    /// 알림 스로틀 윈도우(밀리초)를 설정합니다.
    pub fn notify_window_ms(mut self, ms: u64) -> Self {
        self.config.notify_window_ms = ms;
        self
    }

    /// 자기 식별 마커를 설정합니다.
    pub fn self_markers(mut self, markers: Vec<String>) -> Self {
        self.config.self_markers = markers;
        self
    }

    /// 활성화할 탐지기 목록을 설정합니다.
    pub fn detectors(mut self, ids: Vec<String>) -> Self {
        self.config.detectors = ids;
        self
    }

    /// 알림 제목을 설정합니다.
    pub fn alert_title(mut self, title: impl Into<String>) -> Self {
        self.config.alert_title = title.into();
        self
    }

    /// 설정을 검증하고 `MonitorConfig`를 생성합니다.
    pub fn build(self) -> Result<MonitorConfig, DetectError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = MonitorConfig::default();
        config.validate().unwrap();
        assert_eq!(config.notify_window_ms, 20_000);
        assert_eq!(config.rate_window_ms, 10_000);
    }

    #[test]
    fn from_core_preserves_values() {
        let core = accesswatch_core::config::MonitorSection {
            rate_window_ms: 3000,
            source_command: "adb".to_owned(),
            ..Default::default()
        };
        let config = MonitorConfig::from_core(&core);
        assert_eq!(config.rate_window_ms, 3000);
        assert_eq!(config.source_command, "adb");
        // 확장 필드는 기본값
        assert_eq!(config.notify_window_ms, DEFAULT_NOTIFY_WINDOW_MS);
    }

    #[test]
    fn validate_rejects_zero_rate_window() {
        let config = MonitorConfig {
            rate_window_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_unknown_detector() {
        let mut config = MonitorConfig::default();
        config.detectors.push("barometer".to_owned());
        assert!(config.validate().is_err());
    }

    #[test]
    fn builder_creates_valid_config() {
        let config = MonitorConfigBuilder::new()
            .source_command("cat")
            .rate_window_ms(500)
            .alert_title("Test Alert")
            .build()
            .unwrap();
        assert_eq!(config.source_command, "cat");
        assert_eq!(config.rate_window_ms, 500);
        assert_eq!(config.alert_title, "Test Alert");
    }

    #[test]
    fn builder_rejects_invalid_config() {
        let result = MonitorConfigBuilder::new().rate_window_ms(0).build();
        assert!(result.is_err());
    }
}
