//! 설정 관리 — accesswatch.toml 파싱 및 런타임 설정
//!
//! [`AccesswatchConfig`]는 모든 모듈의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`ACCESSWATCH_MONITOR_RATE_WINDOW_MS=5000` 형식)
//! 3. 설정 파일 (`accesswatch.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), accesswatch_core::error::AccesswatchError> {
//! use accesswatch_core::config::AccesswatchConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = AccesswatchConfig::load("accesswatch.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = AccesswatchConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{AccesswatchError, ConfigError};

/// Accesswatch 통합 설정
///
/// `accesswatch.toml` 파일의 최상위 구조를 나타냅니다.
/// 각 모듈은 자기 섹션만 읽어 사용합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccesswatchConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 접근 모니터 설정
    #[serde(default)]
    pub monitor: MonitorSection,
}

impl AccesswatchConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    ///
    /// 설정 로딩 순서:
    /// 1. TOML 파일 파싱
    /// 2. 환경변수 오버라이드 적용
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, AccesswatchError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, AccesswatchError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AccesswatchError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                AccesswatchError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, AccesswatchError> {
        toml::from_str(toml_str).map_err(|e| {
            AccesswatchError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `ACCESSWATCH_{SECTION}_{FIELD}`
    /// 예: `ACCESSWATCH_MONITOR_RATE_WINDOW_MS=5000`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "ACCESSWATCH_GENERAL_LOG_LEVEL");
        override_string(
            &mut self.general.log_format,
            "ACCESSWATCH_GENERAL_LOG_FORMAT",
        );

        // Monitor
        override_bool(&mut self.monitor.enabled, "ACCESSWATCH_MONITOR_ENABLED");
        override_string(
            &mut self.monitor.source_command,
            "ACCESSWATCH_MONITOR_SOURCE_COMMAND",
        );
        override_csv(
            &mut self.monitor.source_args,
            "ACCESSWATCH_MONITOR_SOURCE_ARGS",
        );
        override_u64(
            &mut self.monitor.rate_window_ms,
            "ACCESSWATCH_MONITOR_RATE_WINDOW_MS",
        );
        override_csv(
            &mut self.monitor.self_markers,
            "ACCESSWATCH_MONITOR_SELF_MARKERS",
        );
        override_csv(&mut self.monitor.detectors, "ACCESSWATCH_MONITOR_DETECTORS");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), AccesswatchError> {
        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        // log_format 검증
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if self.monitor.enabled {
            // 속도 제한 윈도우는 최소 1ms
            if self.monitor.rate_window_ms == 0 {
                return Err(ConfigError::InvalidValue {
                    field: "monitor.rate_window_ms".to_owned(),
                    reason: "must be at least 1".to_owned(),
                }
                .into());
            }

            if self.monitor.source_command.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "monitor.source_command".to_owned(),
                    reason: "source command must not be empty when monitor is enabled".to_owned(),
                }
                .into());
            }

            // 탐지기 id 검증
            let known = ["location", "microphone", "camera"];
            for id in &self.monitor.detectors {
                if !known.contains(&id.as_str()) {
                    return Err(ConfigError::InvalidValue {
                        field: "monitor.detectors".to_owned(),
                        reason: format!("unknown detector id '{}'", id),
                    }
                    .into());
                }
            }
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
        }
    }
}

/// 접근 모니터 설정 섹션
///
/// 탐지 파이프라인이 소비하는 core 수준 설정입니다.
/// `accesswatch-detect`의 `MonitorConfig`는 이 섹션을 확장합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorSection {
    /// 활성화 여부
    pub enabled: bool,
    /// 외부 로그 프로세스 명령 (예: "logcat")
    pub source_command: String,
    /// 외부 로그 프로세스 인자
    pub source_args: Vec<String>,
    /// (패키지, 종류) 단위 속도 제한 윈도우 (밀리초)
    pub rate_window_ms: u64,
    /// 피드백 루프 차단용 자기 식별 마커 — 이 문자열을 포함한 라인은 무시
    pub self_markers: Vec<String>,
    /// 시작 시 활성화할 탐지기 id 목록
    pub detectors: Vec<String>,
}

impl Default for MonitorSection {
    fn default() -> Self {
        Self {
            enabled: true,
            source_command: "logcat".to_owned(),
            source_args: vec!["-v".to_owned(), "time".to_owned()],
            rate_window_ms: 10_000,
            self_markers: vec!["accesswatch".to_owned(), "io.accesswatch".to_owned()],
            detectors: vec![
                "location".to_owned(),
                "microphone".to_owned(),
                "camera".to_owned(),
            ],
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}

fn override_csv(target: &mut Vec<String>, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val.split(',').map(|s| s.trim().to_owned()).collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sane_values() {
        let config = AccesswatchConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.general.log_format, "json");
        assert!(config.monitor.enabled);
        assert_eq!(config.monitor.source_command, "logcat");
        assert_eq!(config.monitor.rate_window_ms, 10_000);
        assert_eq!(config.monitor.detectors.len(), 3);
    }

    #[test]
    fn default_config_passes_validation() {
        let config = AccesswatchConfig::default();
        config.validate().unwrap();
    }

    #[test]
    fn parse_empty_toml_uses_defaults() {
        let config = AccesswatchConfig::parse("").unwrap();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.monitor.source_command, "logcat");
    }

    #[test]
    fn parse_partial_toml_merges_with_defaults() {
        let toml = r#"
[general]
log_level = "debug"

[monitor]
rate_window_ms = 5000
"#;
        let config = AccesswatchConfig::parse(toml).unwrap();
        assert_eq!(config.general.log_level, "debug");
        // log_format은 기본값 유지
        assert_eq!(config.general.log_format, "json");
        assert_eq!(config.monitor.rate_window_ms, 5000);
        assert_eq!(config.monitor.source_command, "logcat");
    }

    #[test]
    fn validate_rejects_unknown_log_level() {
        let mut config = AccesswatchConfig::default();
        config.general.log_level = "verbose".to_owned();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_rate_window() {
        let mut config = AccesswatchConfig::default();
        config.monitor.rate_window_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_unknown_detector_id() {
        let mut config = AccesswatchConfig::default();
        config.monitor.detectors.push("accelerometer".to_owned());
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_skips_monitor_checks_when_disabled() {
        let mut config = AccesswatchConfig::default();
        config.monitor.enabled = false;
        config.monitor.rate_window_ms = 0;
        config.validate().unwrap();
    }

    #[tokio::test]
    async fn from_file_missing_path_is_config_error() {
        let result = AccesswatchConfig::from_file("/nonexistent/accesswatch.toml").await;
        assert!(matches!(
            result,
            Err(AccesswatchError::Config(ConfigError::FileNotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn load_reads_toml_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[monitor]\nrate_window_ms = 2500").unwrap();
        let config = AccesswatchConfig::load(file.path()).await.unwrap();
        assert_eq!(config.monitor.rate_window_ms, 2500);
    }
}
