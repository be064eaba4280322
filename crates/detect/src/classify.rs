//! 패턴 분류기 -- 로그 라인을 접근 이벤트 종류로 분류합니다.
//!
//! [`PatternTable`]은 (종류, 정규식) 쌍의 순서 있는 목록입니다.
//! 선언 순서가 우선순위를 인코딩합니다: 한 라인이 구체적인 패턴과
//! 일반적인 패턴을 동시에 만족할 수 있으므로, 구체적인 패턴을 먼저
//! 선언하여 오분류를 막습니다. 첫 매치가 승리하고, 순서가 전순서이므로
//! 동점은 구성상 불가능합니다.
//!
//! 정규식은 테이블 구성 시 한 번만 컴파일하며, 테이블은 구성 후
//! 불변이므로 여러 탐지기에서 동시에 호출해도 안전합니다.

use regex::Regex;

use accesswatch_core::types::EventKind;

use crate::error::DetectError;

/// 순서 있는 패턴 테이블
///
/// 카테고리별 탐지기가 하나씩 소유합니다. `classify`는 선언 순서대로
/// 각 패턴의 부분 매치(find)를 시도하고 첫 매치의 종류를 반환합니다.
pub struct PatternTable {
    /// (종류, 컴파일된 정규식) — 선언 순서 유지
    entries: Vec<(EventKind, Regex)>,
}

impl PatternTable {
    /// 패턴 목록을 컴파일하여 테이블을 생성합니다.
    ///
    /// 모든 패턴은 대소문자 무시로 컴파일됩니다.
    pub fn compile(patterns: &[(EventKind, &str)]) -> Result<Self, DetectError> {
        let mut entries = Vec::with_capacity(patterns.len());
        for (kind, pattern) in patterns {
            let regex =
                Regex::new(&format!("(?i){pattern}")).map_err(|e| DetectError::Pattern {
                    kind: kind.name().to_owned(),
                    reason: e.to_string(),
                })?;
            entries.push((*kind, regex));
        }
        Ok(Self { entries })
    }

    /// 라인을 분류합니다.
    ///
    /// 선언 순서대로 패턴을 시도하여 라인 어디서든 매치되는 첫 종류를
    /// 반환합니다. 아무것도 매치되지 않으면 `None`("unknown" 센티널)을
    /// 반환합니다. 부작용이 없습니다.
    pub fn classify(&self, line: &str) -> Option<EventKind> {
        self.entries
            .iter()
            .find(|(_, regex)| regex.is_match(line))
            .map(|(kind, _)| *kind)
    }

    /// 테이블의 패턴 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 테이블이 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 위치 접근 패턴 테이블을 생성합니다.
///
/// 구체적인 요청/전달 패턴이 먼저, 일반 "Location changed"가 마지막입니다.
pub fn location_table() -> Result<PatternTable, DetectError> {
    PatternTable::compile(&[
        (EventKind::Request, r"request(LocationUpdates|SingleUpdate)"),
        (EventKind::LastKnown, r"getLastKnownLocation"),
        (
            EventKind::Fused,
            r"FusedLocation.*location (delivery|update|report|blocked)",
        ),
        (EventKind::Gnss, r"Gnss:onGnssLocationCb"),
        (
            EventKind::Assistant,
            r"AiAiLocation.*Request(ing)? location updates?",
        ),
        (
            EventKind::Report,
            r"(LocationReporter sending|Successfully inserted .* locations)",
        ),
        (EventKind::Changed, r"Location changed"),
    ])
}

/// 마이크 접근 패턴 테이블을 생성합니다.
///
/// MediaRecorder가 일반 코덱 패턴보다 먼저 와야 합니다. 녹음 시작
/// 라인은 둘 다 만족할 수 있습니다.
pub fn microphone_table() -> Result<PatternTable, DetectError> {
    PatternTable::compile(&[
        (EventKind::MediaRecorder, r"(MediaRecorder|start recording)"),
        (
            EventKind::Codec,
            r"(MediaCodec|CCodec).*encoder|aac\.encoder",
        ),
        (EventKind::AudioRecord, r"AudioRecord.*(start|read)|mic_input"),
        (EventKind::Writer, r"MPEG4Writer.*setStartTimestampUs"),
        (EventKind::Hotword, r"(SoundTrigger|Hotword).*?(start|capture)"),
        (
            EventKind::Stt,
            r"(AudioInputStreamProducer|SodaSpeechRecognizer|NetworkSpeechRecognizer|RecognitionClient)",
        ),
        (
            EventKind::AudioFocus,
            r"(#audio#.*?(acquire|activat|opening|start)|AudioFocus)",
        ),
        (
            EventKind::AudioService,
            r"AudioService.*Start recording use case",
        ),
    ])
}

/// 카메라 접근 패턴 테이블을 생성합니다.
pub fn camera_table() -> Result<PatternTable, DetectError> {
    PatternTable::compile(&[
        (
            EventKind::CameraApi,
            r"CameraClient@[0-9a-f]+.*(startPreview|takePicture|connect)",
        ),
        (
            EventKind::Camera2,
            r"(CameraDevice|CaptureSession).*?configure|openCamera",
        ),
        (
            EventKind::CameraService,
            r"(CameraService|ICamera).*open|device.*open|HAL3.*open",
        ),
        (
            EventKind::VideoCodec,
            r"(MediaCodec|CCodec).*encoder.*(avc|h264|hevc|vp8|vp9)",
        ),
        (
            EventKind::VideoRecorder,
            r"MediaRecorder.*(start|prepare).*video",
        ),
        (EventKind::Torch, r"TorchState.*ON|FlashlightController.*turnOn"),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_returns_none_when_nothing_matches() {
        let table = microphone_table().unwrap();
        assert_eq!(table.classify("I ActivityManager: start proc 1234"), None);
    }

    #[test]
    fn classify_is_case_insensitive() {
        let table = microphone_table().unwrap();
        assert_eq!(
            table.classify("mediarecorder started"),
            Some(EventKind::MediaRecorder)
        );
        assert_eq!(
            table.classify("MEDIARECORDER started"),
            Some(EventKind::MediaRecorder)
        );
    }

    #[test]
    fn earlier_pattern_wins_over_later() {
        // MediaRecorder 패턴과 코덱 패턴을 동시에 만족하는 라인
        let table = microphone_table().unwrap();
        let line = "MediaRecorder: MediaCodec aac encoder configured";
        assert_eq!(table.classify(line), Some(EventKind::MediaRecorder));
    }

    #[test]
    fn location_kinds_classify() {
        let table = location_table().unwrap();
        assert_eq!(
            table.classify("LocationManagerService: requestLocationUpdates by uid=1000"),
            Some(EventKind::Request)
        );
        assert_eq!(
            table.classify("app called getLastKnownLocation"),
            Some(EventKind::LastKnown)
        );
        assert_eq!(
            table.classify("FusedLocationProvider: location delivery to com.app"),
            Some(EventKind::Fused)
        );
        assert_eq!(
            table.classify("Gnss:onGnssLocationCb fix acquired"),
            Some(EventKind::Gnss)
        );
        assert_eq!(
            table.classify("GmsCore Location changed for client"),
            Some(EventKind::Changed)
        );
    }

    #[test]
    fn microphone_kinds_classify() {
        let table = microphone_table().unwrap();
        assert_eq!(
            table.classify("AudioRecord: start() from pid 321"),
            Some(EventKind::AudioRecord)
        );
        assert_eq!(
            table.classify("MPEG4Writer: setStartTimestampUs 120033"),
            Some(EventKind::Writer)
        );
        assert_eq!(
            table.classify("SoundTrigger: capture session opened"),
            Some(EventKind::Hotword)
        );
        assert_eq!(
            table.classify("SodaSpeechRecognizer warmup"),
            Some(EventKind::Stt)
        );
        assert_eq!(
            table.classify("AudioService: Start recording use case voice"),
            Some(EventKind::AudioService)
        );
    }

    #[test]
    fn camera_kinds_classify() {
        let table = camera_table().unwrap();
        assert_eq!(
            table.classify("CameraClient@3f2a1b: startPreview"),
            Some(EventKind::CameraApi)
        );
        assert_eq!(
            table.classify("CameraDevice-JV-0: waiting for idle to configure"),
            Some(EventKind::Camera2)
        );
        assert_eq!(
            table.classify("CameraService: open camera 0 for client"),
            Some(EventKind::CameraService)
        );
        assert_eq!(
            table.classify("CCodec: c2.android.avc.encoder started"),
            Some(EventKind::VideoCodec)
        );
        assert_eq!(
            table.classify("TorchState changed to ON"),
            Some(EventKind::Torch)
        );
    }

    #[test]
    fn tables_preserve_declared_length() {
        assert_eq!(location_table().unwrap().len(), 7);
        assert_eq!(microphone_table().unwrap().len(), 8);
        assert_eq!(camera_table().unwrap().len(), 6);
    }

    #[test]
    fn invalid_pattern_reports_kind() {
        let err = PatternTable::compile(&[(EventKind::Torch, "(unclosed")].as_slice())
            .err()
            .unwrap();
        assert!(err.to_string().contains("torch"));
    }

    // Property-based tests using proptest
    #[cfg(test)]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn classify_arbitrary_line_does_not_panic(line in "\\PC{0,500}") {
                let table = microphone_table().unwrap();
                let _ = table.classify(&line);
            }

            #[test]
            fn classify_is_deterministic(line in "\\PC{0,200}") {
                let table = camera_table().unwrap();
                prop_assert_eq!(table.classify(&line), table.classify(&line));
            }

            #[test]
            fn case_change_does_not_alter_result(line in "[a-zA-Z :.#]{0,200}") {
                let table = location_table().unwrap();
                prop_assert_eq!(
                    table.classify(&line),
                    table.classify(&line.to_uppercase())
                );
            }
        }
    }
}
