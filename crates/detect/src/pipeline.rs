//! 모니터 파이프라인 오케스트레이션
//!
//! [`MonitorPipeline`]은 core의 [`Pipeline`](accesswatch_core::pipeline::Pipeline)
//! trait을 구현하여 `accesswatch-daemon`에서 다른 모듈과 동일한
//! 생명주기로 관리됩니다.
//!
//! # 내부 아키텍처
//! ```text
//! LogStreamReader -> DetectorRegistry -> AccessDetector -> SinkHandle -> EventSink
//! ```

use std::sync::Arc;

use accesswatch_core::error::AccesswatchError;
use accesswatch_core::pipeline::{EventSink, HealthStatus, Pipeline, UidResolver};
use accesswatch_core::types::Category;

use crate::attribute::PackageAttributor;
use crate::config::MonitorConfig;
use crate::detector::{AccessDetector, DetectorShared};
use crate::error::DetectError;
use crate::notify::NotificationThrottle;
use crate::ratelimit::{MonotonicClock, RateWindow};
use crate::reader::{LogStreamReader, ReaderStatus};
use crate::registry::DetectorRegistry;
use crate::sink::SinkHandle;

/// 파이프라인 실행 상태
#[derive(Debug, Clone, PartialEq, Eq)]
enum PipelineState {
    /// 초기화됨, 아직 시작하지 않음
    Initialized,
    /// 실행 중
    Running,
    /// 정지됨
    Stopped,
}

/// 외부 설정 신호용 제어 핸들
///
/// 탐지기 토글, 윈도우 갱신, 싱크 교체를 파이프라인 수명주기와
/// 분리하여 다른 태스크에서 호출할 수 있게 합니다.
#[derive(Clone)]
pub struct MonitorControl {
    registry: Arc<DetectorRegistry>,
}

impl MonitorControl {
    /// 탐지기를 활성화하거나 비활성화합니다. 알 수 없는 id는 무시합니다.
    pub fn set_enabled(&self, detector_id: &str, enabled: bool) {
        self.registry.set_enabled(detector_id, enabled);
    }

    /// 공유 속도 제한 윈도우를 갱신합니다.
    pub fn update_window(&self, ms: u64) {
        self.registry.update_window(ms);
    }

    /// 이벤트 싱크를 교체합니다.
    pub fn replace_sink(&self, sink: Option<Arc<dyn EventSink>>) {
        self.registry.replace_sink(sink);
    }
}

/// 모니터 파이프라인 -- 읽기/분류/귀속/속도 제한/방출의 전체 흐름
///
/// # 사용 예시
/// ```ignore
/// use accesswatch_detect::{MonitorPipeline, MonitorPipelineBuilder};
///
/// let mut pipeline = MonitorPipelineBuilder::new()
///     .config(config)
///     .sink(sink)
///     .build()?;
///
/// pipeline.start().await?;
/// ```
pub struct MonitorPipeline {
    config: MonitorConfig,
    state: PipelineState,
    registry: Arc<DetectorRegistry>,
    reader: LogStreamReader,
}

impl MonitorPipeline {
    /// 현재 상태 이름을 반환합니다.
    pub fn state_name(&self) -> &str {
        match self.state {
            PipelineState::Initialized => "initialized",
            PipelineState::Running => "running",
            PipelineState::Stopped => "stopped",
        }
    }

    /// 제어 핸들을 반환합니다.
    pub fn control(&self) -> MonitorControl {
        MonitorControl {
            registry: self.registry.clone(),
        }
    }

    /// 레지스트리에 대한 공유 참조를 반환합니다.
    pub fn registry(&self) -> &Arc<DetectorRegistry> {
        &self.registry
    }

    /// 파이프라인 설정을 반환합니다.
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }
}

impl Pipeline for MonitorPipeline {
    async fn start(&mut self) -> Result<(), AccesswatchError> {
        if self.state == PipelineState::Running {
            return Err(accesswatch_core::error::PipelineError::AlreadyRunning.into());
        }

        tracing::info!("starting monitor pipeline");
        self.reader.start().map_err(AccesswatchError::from)?;
        self.state = PipelineState::Running;
        tracing::info!(
            detectors = self.registry.len(),
            window_ms = self.registry.window_ms(),
            "monitor pipeline started"
        );
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), AccesswatchError> {
        if self.state != PipelineState::Running {
            return Err(accesswatch_core::error::PipelineError::NotRunning.into());
        }

        tracing::info!("stopping monitor pipeline");
        self.reader.stop().await;
        self.state = PipelineState::Stopped;
        tracing::info!("monitor pipeline stopped");
        Ok(())
    }

    async fn health_check(&self) -> HealthStatus {
        match self.state {
            PipelineState::Running => match self.reader.status() {
                ReaderStatus::Running => HealthStatus::Healthy,
                ReaderStatus::Stopped => {
                    HealthStatus::Degraded("log source stream ended".to_owned())
                }
                ReaderStatus::Error(e) => {
                    HealthStatus::Unhealthy(format!("log source failed: {e}"))
                }
                ReaderStatus::Idle => HealthStatus::Unhealthy("reader not started".to_owned()),
            },
            PipelineState::Initialized => HealthStatus::Unhealthy("not started".to_owned()),
            PipelineState::Stopped => HealthStatus::Unhealthy("stopped".to_owned()),
        }
    }
}

/// 모니터 파이프라인 빌더
///
/// 설정을 검증하고 탐지기/레지스트리/리더를 구성합니다.
pub struct MonitorPipelineBuilder {
    config: MonitorConfig,
    sink: Option<Arc<dyn EventSink>>,
    resolver: Option<Arc<dyn UidResolver>>,
}

impl MonitorPipelineBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self {
            config: MonitorConfig::default(),
            sink: None,
            resolver: None,
        }
    }

    /// 파이프라인 설정을 지정합니다.
    pub fn config(mut self, config: MonitorConfig) -> Self {
        self.config = config;
        self
    }

    /// 이벤트 싱크를 주입합니다.
    ///
    /// 설정하지 않으면 싱크가 연결될 때까지 방출이 버려집니다.
    pub fn sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// 선택적 UID 리졸버를 주입합니다.
    pub fn uid_resolver(mut self, resolver: Arc<dyn UidResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// 파이프라인을 빌드합니다.
    ///
    /// 설정의 `detectors` 목록 순서대로 탐지기를 등록합니다. 이 순서가
    /// 디스패치 순서가 됩니다.
    pub fn build(self) -> Result<MonitorPipeline, DetectError> {
        self.config.validate()?;

        let sink_handle = match self.sink {
            Some(sink) => SinkHandle::with_sink(sink),
            None => SinkHandle::new(),
        };
        let window = RateWindow::new(self.config.rate_window_ms);
        let shared = DetectorShared {
            attributor: Arc::new(PackageAttributor::with_resolver(self.resolver)?),
            window: window.clone(),
            throttle: Arc::new(NotificationThrottle::new(self.config.notify_window_ms)),
            sink: sink_handle.clone(),
            clock: MonotonicClock::new(),
            alert_title: self.config.alert_title.clone(),
        };

        let registry = Arc::new(DetectorRegistry::new(window, sink_handle));
        for id in &self.config.detectors {
            let category = Category::from_id(id).ok_or_else(|| DetectError::Config {
                field: "detectors".to_owned(),
                reason: format!("unknown detector id '{id}'"),
            })?;
            let detector = AccessDetector::for_category(category, shared.clone())?;
            registry.register(Arc::new(detector));
        }

        let reader = LogStreamReader::new(self.config.clone(), registry.clone());

        Ok(MonitorPipeline {
            config: self.config,
            state: PipelineState::Initialized,
            registry,
            reader,
        })
    }
}

impl Default for MonitorPipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
