//! 도메인 타입 — 시스템 전역에서 사용되는 공통 타입
//!
//! 탐지 카테고리([`Category`])와 접근 이벤트 종류([`EventKind`])를 정의합니다.
//! 각 모듈은 이 타입들을 사용하여 이벤트와 데이터를 교환합니다.

use std::fmt;

use serde::{Deserialize, Serialize};

/// 탐지 카테고리 — 민감 리소스의 종류
///
/// 각 카테고리는 하나의 탐지기에 대응하며, 안정적인 문자열 id를 가집니다.
/// id는 설정 파일, 활성화 토글, 알림 스로틀 키에 사용됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// 위치 정보 접근
    Location,
    /// 마이크 접근
    Microphone,
    /// 카메라 접근
    Camera,
}

impl Category {
    /// 안정적인 식별자를 반환합니다 (예: "microphone").
    pub fn id(self) -> &'static str {
        match self {
            Self::Location => "location",
            Self::Microphone => "microphone",
            Self::Camera => "camera",
        }
    }

    /// 포맷된 로그 레코드에 쓰이는 사람이 읽는 이름을 반환합니다.
    pub fn label(self) -> &'static str {
        self.id()
    }

    /// 로그 레코드 앞에 붙는 카테고리 아이콘을 반환합니다.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Location => "📍",
            Self::Microphone => "🎙️",
            Self::Camera => "📷",
        }
    }

    /// id 문자열에서 카테고리를 파싱합니다.
    ///
    /// 대소문자를 구분하지 않습니다.
    pub fn from_id(id: &str) -> Option<Self> {
        match id.to_lowercase().as_str() {
            "location" => Some(Self::Location),
            "microphone" => Some(Self::Microphone),
            "camera" => Some(Self::Camera),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// 접근 이벤트 종류
///
/// 탐지기별 패턴 테이블의 키이며, (패키지, 종류) 단위 속도 제한의 키이기도
/// 합니다. 분류 실패("unknown" 센티널)는 분류기 경계에서
/// `Option<EventKind>`의 `None`으로 표현합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    // --- location ---
    /// 위치 업데이트 요청 (requestLocationUpdates 등)
    Request,
    /// 마지막 위치 조회 (getLastKnownLocation)
    LastKnown,
    /// Fused location 전달/갱신/보고/차단
    Fused,
    /// GNSS 콜백
    Gnss,
    /// 어시스턴트 위치 요청
    Assistant,
    /// 위치 레포트 전송/삽입
    Report,
    /// 일반 "location changed"
    Changed,

    // --- microphone ---
    /// MediaRecorder 녹음 시작
    MediaRecorder,
    /// 오디오 인코더 (AAC 등)
    Codec,
    /// AudioRecord 시작/읽기
    AudioRecord,
    /// 미디어 라이터 타임스탬프 설정
    Writer,
    /// 핫워드/사운드 트리거 캡처
    Hotword,
    /// 음성 인식 클라이언트
    Stt,
    /// 오디오 포커스 획득
    AudioFocus,
    /// 오디오 서비스 수준의 녹음 시작
    AudioService,

    // --- camera ---
    /// 레거시 카메라 API (preview/capture/connect)
    CameraApi,
    /// camera2 API (device/session configure, open)
    Camera2,
    /// 카메라 서비스/HAL 오픈
    CameraService,
    /// 하드웨어 비디오 인코더 시작
    VideoCodec,
    /// MediaRecorder 비디오 시작/준비
    VideoRecorder,
    /// 플래시라이트(torch) 점등
    Torch,
}

impl EventKind {
    /// 포맷된 로그 레코드에 쓰이는 소문자 이름을 반환합니다.
    pub fn name(self) -> &'static str {
        match self {
            Self::Request => "request",
            Self::LastKnown => "last_known",
            Self::Fused => "fused",
            Self::Gnss => "gnss",
            Self::Assistant => "assistant",
            Self::Report => "report",
            Self::Changed => "changed",
            Self::MediaRecorder => "mediarecorder",
            Self::Codec => "codec",
            Self::AudioRecord => "audiorecord",
            Self::Writer => "writer",
            Self::Hotword => "hotword",
            Self::Stt => "stt",
            Self::AudioFocus => "audio_focus",
            Self::AudioService => "audio_service",
            Self::CameraApi => "camera_api",
            Self::Camera2 => "camera2",
            Self::CameraService => "camera_service",
            Self::VideoCodec => "video_codec",
            Self::VideoRecorder => "video_recorder",
            Self::Torch => "torch",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_id_roundtrip() {
        for cat in [Category::Location, Category::Microphone, Category::Camera] {
            assert_eq!(Category::from_id(cat.id()), Some(cat));
        }
    }

    #[test]
    fn category_from_id_is_case_insensitive() {
        assert_eq!(Category::from_id("Microphone"), Some(Category::Microphone));
        assert_eq!(Category::from_id("CAMERA"), Some(Category::Camera));
        assert_eq!(Category::from_id("unknown"), None);
    }

    #[test]
    fn category_icons_are_distinct() {
        assert_ne!(Category::Location.icon(), Category::Microphone.icon());
        assert_ne!(Category::Microphone.icon(), Category::Camera.icon());
    }

    #[test]
    fn event_kind_names_are_lowercase() {
        for kind in [
            EventKind::MediaRecorder,
            EventKind::LastKnown,
            EventKind::CameraService,
        ] {
            let name = kind.name();
            assert_eq!(name, name.to_lowercase());
        }
    }

    #[test]
    fn category_serde_lowercase() {
        let json = serde_json::to_string(&Category::Microphone).unwrap();
        assert_eq!(json, "\"microphone\"");
        let parsed: Category = serde_json::from_str("\"camera\"").unwrap();
        assert_eq!(parsed, Category::Camera);
    }
}
