//! Demo inbox content
//!
//! Inserted into an empty database so the inbox has something to browse.

use chrono::{Duration, Utc};

use super::models::{Channel, Message, RiskHint};

struct DemoMessage {
    id: &'static str,
    channel: Channel,
    sender_name: &'static str,
    sender_id: &'static str,
    content: &'static str,
    minutes_ago: i64,
    risk_hint: Option<RiskHint>,
}

const DEMO_MESSAGES: &[DemoMessage] = &[
    DemoMessage {
        id: "msg_sms_001",
        channel: Channel::Sms,
        sender_name: "CJ대한통운",
        sender_id: "+82-10-3921-4471",
        content: "[CJ대한통운] 고객님의 택배가 주소 불일치로 보관 중입니다. 아래 링크에서 주소를 즉시 확인해 주세요 http://bit.ly/3xK9dLq",
        minutes_ago: 12,
        risk_hint: Some(RiskHint::Warn),
    },
    DemoMessage {
        id: "msg_sms_002",
        channel: Channel::Sms,
        sender_name: "엄마",
        sender_id: "+82-10-5512-0923",
        content: "저녁 7시에 집 앞에서 보자",
        minutes_ago: 45,
        risk_hint: Some(RiskHint::Safe),
    },
    DemoMessage {
        id: "msg_sms_003",
        channel: Channel::Sms,
        sender_name: "국민은행",
        sender_id: "1588-9999",
        content: "[국민은행] 고객님의 계좌가 비정상 거래로 일시 정지되었습니다. 본인 인증을 위해 보안카드 번호를 입력하세요 https://kb-secure-login.com",
        minutes_ago: 130,
        risk_hint: Some(RiskHint::Warn),
    },
    DemoMessage {
        id: "msg_sms_004",
        channel: Channel::Sms,
        sender_name: "치과",
        sender_id: "02-555-0142",
        content: "내일 오후 3시 스케일링 예약이 있습니다. 변경이 필요하시면 연락 주세요.",
        minutes_ago: 300,
        risk_hint: None,
    },
    DemoMessage {
        id: "msg_kakao_001",
        channel: Channel::Kakao,
        sender_name: "딸",
        sender_id: "kakao_77120",
        content: "엄마 나 폰 액정이 깨져서 임시폰으로 연락해. 급하게 문화상품권 구매해야 하는데 인증번호 좀 보내줄 수 있어?",
        minutes_ago: 20,
        risk_hint: Some(RiskHint::Warn),
    },
    DemoMessage {
        id: "msg_kakao_002",
        channel: Channel::Kakao,
        sender_name: "김민수",
        sender_id: "kakao_10442",
        content: "주말에 등산 갈래?",
        minutes_ago: 95,
        risk_hint: None,
    },
    DemoMessage {
        id: "msg_facebook_001",
        channel: Channel::Facebook,
        sender_name: "Meta Support",
        sender_id: "fb_100093",
        content: "Your page will be permanently disabled within 24 hours for violating our policies. Verify your account immediately: https://meta-appeal-center.help",
        minutes_ago: 60,
        risk_hint: Some(RiskHint::Warn),
    },
    DemoMessage {
        id: "msg_facebook_002",
        channel: Channel::Facebook,
        sender_name: "Jisoo Park",
        sender_id: "fb_220481",
        content: "Thanks for coming yesterday!",
        minutes_ago: 240,
        risk_hint: Some(RiskHint::Safe),
    },
    DemoMessage {
        id: "msg_instagram_001",
        channel: Channel::Instagram,
        sender_name: "brand.collab.team",
        sender_id: "ig_58821",
        content: "Congratulations! You won a $500 gift card from our giveaway. Claim your prize now at https://tinyurl.com/ig-prize-claim before it expires",
        minutes_ago: 33,
        risk_hint: Some(RiskHint::Warn),
    },
    DemoMessage {
        id: "msg_instagram_002",
        channel: Channel::Instagram,
        sender_name: "hana.cooks",
        sender_id: "ig_12093",
        content: "레시피 공유해줘서 고마워요!",
        minutes_ago: 500,
        risk_hint: None,
    },
    DemoMessage {
        id: "msg_email_001",
        channel: Channel::Email,
        sender_name: "국세청",
        sender_id: "notice@nts-refund.kr",
        content: "[국세청] 미환급 세금 환급 대상자로 선정되었습니다. 환급 신청을 위해 첨부된 앱을 설치하고 주민등록번호를 입력해 주십시오.",
        minutes_ago: 75,
        risk_hint: Some(RiskHint::Warn),
    },
    DemoMessage {
        id: "msg_email_002",
        channel: Channel::Email,
        sender_name: "Team Calendar",
        sender_id: "calendar@example.com",
        content: "Weekly sync moved to Thursday 10:00. Agenda attached in the shared folder.",
        minutes_ago: 180,
        risk_hint: Some(RiskHint::Safe),
    },
];

/// Demo messages with timestamps relative to now
pub(crate) fn demo_messages() -> Vec<Message> {
    let now = Utc::now();
    DEMO_MESSAGES
        .iter()
        .map(|demo| Message {
            id: demo.id.to_string(),
            channel: demo.channel,
            sender_name: demo.sender_name.to_string(),
            sender_id: demo.sender_id.to_string(),
            content: demo.content.to_string(),
            ts: now - Duration::minutes(demo.minutes_ago),
            risk_hint: demo.risk_hint,
        })
        .collect()
}
