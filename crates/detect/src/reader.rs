//! 로그 스트림 리더
//!
//! 계속 실행되는 외부 로그 프로세스를 기동하고, 표준 출력을 라인
//! 단위로 읽어 레지스트리에 디스패치하는 워커 태스크를 소유합니다.
//!
//! 상태 기계는 Idle -> Running -> Stopped이며, 스트림 종료나 I/O
//! 에러 시 Error로 전이합니다. 루프는 라인 사이에서만 취소되고, 종료
//! 시 외부 프로세스 중단은 best-effort입니다. 자동 재시작은 하지
//! 않습니다. 재시작 정책은 상위 계층의 몫입니다.

use std::process::Stdio;
use std::sync::{Arc, Mutex, PoisonError};

use metrics::counter;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use accesswatch_core::metrics::{READER_LINES_SKIPPED_TOTAL, READER_LINES_TOTAL};

use crate::config::MonitorConfig;
use crate::error::DetectError;
use crate::registry::DetectorRegistry;

/// 리더 실행 상태
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReaderStatus {
    /// 생성됨, 아직 시작하지 않음
    Idle,
    /// 워커 태스크 실행 중
    Running,
    /// 에러로 중단됨
    Error(String),
    /// 정지됨 (정상 종료 또는 스트림 종료)
    Stopped,
}

/// 로그 스트림 리더
///
/// 외부 프로세스와 워커 태스크를 소유합니다. 라인은 내부 큐 없이
/// 읽는 즉시 탐지기 체인 전체를 동기적으로 통과합니다.
pub struct LogStreamReader {
    config: MonitorConfig,
    registry: Arc<DetectorRegistry>,
    status: Arc<Mutex<ReaderStatus>>,
    cancel: CancellationToken,
    task: Option<tokio::task::JoinHandle<()>>,
}

impl LogStreamReader {
    /// 설정과 레지스트리로 리더를 생성합니다. 아직 시작하지 않습니다.
    pub fn new(config: MonitorConfig, registry: Arc<DetectorRegistry>) -> Self {
        Self {
            config,
            registry,
            status: Arc::new(Mutex::new(ReaderStatus::Idle)),
            cancel: CancellationToken::new(),
            task: None,
        }
    }

    /// 현재 상태를 반환합니다.
    pub fn status(&self) -> ReaderStatus {
        self.status
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_status(status: &Mutex<ReaderStatus>, next: ReaderStatus) {
        *status.lock().unwrap_or_else(PoisonError::into_inner) = next;
    }

    /// 외부 프로세스를 기동하고 읽기 루프를 시작합니다.
    ///
    /// 이미 실행 중이면 아무것도 하지 않습니다 (멱등 시작).
    pub fn start(&mut self) -> Result<(), DetectError> {
        if self.status() == ReaderStatus::Running {
            debug!("reader already running, start is a no-op");
            return Ok(());
        }

        let mut child = Command::new(&self.config.source_command)
            .args(&self.config.source_args)
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| DetectError::SourceSpawn {
                command: self.config.source_command.clone(),
                reason: e.to_string(),
            })?;
        let stdout = child.stdout.take().ok_or_else(|| DetectError::SourceSpawn {
            command: self.config.source_command.clone(),
            reason: "stdout not captured".to_owned(),
        })?;

        info!(
            command = %self.config.source_command,
            "log source process spawned"
        );

        self.cancel = CancellationToken::new();
        let cancel = self.cancel.clone();
        let registry = self.registry.clone();
        let markers = self.config.self_markers.clone();
        let status = self.status.clone();
        Self::set_status(&status, ReaderStatus::Running);

        self.task = Some(tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            let exit = loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        info!("reader loop cancelled");
                        break ReaderStatus::Stopped;
                    }
                    line = lines.next_line() => match line {
                        Ok(Some(line)) => {
                            let line = line.trim();
                            counter!(READER_LINES_TOTAL).increment(1);
                            if markers.iter().any(|m| line.contains(m.as_str())) {
                                counter!(READER_LINES_SKIPPED_TOTAL).increment(1);
                                continue;
                            }
                            registry.dispatch(line);
                        }
                        Ok(None) => {
                            info!("log source stream ended");
                            break ReaderStatus::Stopped;
                        }
                        Err(e) => {
                            error!(error = %e, "log source read failed");
                            break ReaderStatus::Error(e.to_string());
                        }
                    }
                }
            };
            // 프로세스 중단은 best-effort
            if let Err(e) = child.kill().await {
                debug!(error = %e, "log source process kill failed");
            }
            Self::set_status(&status, exit);
        }));

        Ok(())
    }

    /// 읽기 루프를 취소하고 외부 프로세스를 중단합니다.
    ///
    /// 워커 태스크의 종료를 기다립니다. 실행 중이 아니면 아무것도
    /// 하지 않습니다.
    pub async fn stop(&mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                debug!(error = %e, "reader task join failed");
            }
        }
        if self.status() == ReaderStatus::Running {
            Self::set_status(&self.status, ReaderStatus::Stopped);
        }
        info!("reader stopped");
    }
}
