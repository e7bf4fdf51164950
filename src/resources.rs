// Static mental-health resource listing

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct CrisisLine {
    pub name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<&'static str>,
    pub available: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct CrisisLines {
    pub india: &'static [CrisisLine],
    pub us: &'static [CrisisLine],
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Resources {
    pub crisis_lines: CrisisLines,
    pub coping_techniques: &'static [&'static str],
    pub self_care: &'static [&'static str],
}

const INDIA_LINES: &[CrisisLine] = &[
    CrisisLine {
        name: "AASRA",
        number: Some("9152987821"),
        text: None,
        available: "24/7",
    },
    CrisisLine {
        name: "Vandrevala Foundation",
        number: Some("1860-2662-345"),
        text: None,
        available: "24/7",
    },
    CrisisLine {
        name: "iCall",
        number: Some("9152987821"),
        text: None,
        available: "Mon-Sat 8am-10pm",
    },
];

const US_LINES: &[CrisisLine] = &[
    CrisisLine {
        name: "Suicide & Crisis Lifeline",
        number: Some("988"),
        text: None,
        available: "24/7",
    },
    CrisisLine {
        name: "Crisis Text Line",
        number: None,
        text: Some("HOME to 741741"),
        available: "24/7",
    },
];

const COPING_TECHNIQUES: &[&str] = &[
    "🌬️ 4-4-4 Breathing: Inhale 4 sec, hold 4 sec, exhale 4 sec",
    "🖐️ 5-4-3-2-1 Grounding: Name 5 things you see, 4 you touch, 3 you hear, 2 you smell, 1 you taste",
    "📝 Journal your thoughts without judgment",
    "🚶 Take a mindful walk, focus on each step",
    "💧 Drink cold water slowly and mindfully",
    "🎵 Listen to calming music or nature sounds",
];

const SELF_CARE: &[&str] = &[
    "😴 Maintain regular sleep (7-9 hours)",
    "🥗 Eat nutritious meals, stay hydrated",
    "🏃 Move your body daily, even just 10 min",
    "📱 Take social media breaks",
    "💙 Set healthy boundaries with others",
    "🙏 Practice daily gratitude",
];

pub const RESOURCES: Resources = Resources {
    crisis_lines: CrisisLines {
        india: INDIA_LINES,
        us: US_LINES,
    },
    coping_techniques: COPING_TECHNIQUES,
    self_care: SELF_CARE,
};

pub fn resources() -> &'static Resources {
    &RESOURCES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resources_json_shape() {
        let json = serde_json::to_value(resources()).unwrap();
        assert_eq!(json["crisis_lines"]["us"][0]["number"], "988");
        assert_eq!(json["crisis_lines"]["us"][1]["text"], "HOME to 741741");
        assert!(json["crisis_lines"]["us"][1].get("number").is_none());
        assert_eq!(json["crisis_lines"]["india"].as_array().unwrap().len(), 3);
        assert_eq!(json["coping_techniques"].as_array().unwrap().len(), 6);
        assert_eq!(json["self_care"].as_array().unwrap().len(), 6);
    }
}
