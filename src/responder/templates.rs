// Reply templates

use crate::analysis::Emotion;

pub const CRISIS_RESPONSE: &str = "hey… I'm really sorry you're in this much pain.  \n\
I'm here with you, but I need you to reach out to someone who can help right now.

📞 India: 9152987821 (AASRA)
📞 US: 988 (Suicide & Crisis Lifeline)
📞 Text HOME to 741741 (Crisis Text Line)

💛 You matter. Your life matters. Please reach out.
You deserve help, love, and safety.";

pub const GREETING_RESPONSES: &[&str] = &[
    "hey! how's it going? 😊",
    "hii! what's up? how are you feeling today?",
    "hey there! good to see you. how've you been?",
    "heyyy! how are things with you?",
    "hi! I'm here for you. what's on your mind today?",
    "hey! nice to hear from you. how's your day going?",
    "heyy! how are you doing? 💙",
];

pub const FAREWELL_RESPONSES: &[&str] = &[
    "take care babe! I'm always here if you need me 💜",
    "bye! remember to be kind to yourself today ✨",
    "see you! you've got this 💪",
    "later! come back anytime you need to talk 🤍",
    "goodbye! sending you good vibes 🌟",
];

const SADNESS_RESPONSES: &[&str] = &[
    "hey love… I'm really sorry you're feeling like this. you don't have to go through it alone.",
    "breathe for a sec babe… I'm right here with you.",
    "I'm so sorry you're going through this. your feelings are valid and I'm here to listen.",
    "that sounds really hard. I'm here with you, no judgment at all.",
    "sending you so much love right now. you're not alone in this 💙",
];

const FEAR_RESPONSES: &[&str] = &[
    "it's okay to feel scared sometimes. you're safe right now, I promise.",
    "I'm here with you… you're not facing this alone.",
    "anxiety can be overwhelming, but you've got this. let's take it one breath at a time.",
    "I hear you. those fears are valid. want to talk about what's worrying you?",
    "you're so brave for sharing this. I'm right here with you 🤍",
];

const ANGER_RESPONSES: &[&str] = &[
    "your feelings are valid, babe. it's okay to let it out.",
    "I hear you, and I'm not judging at all.",
    "it's totally okay to feel angry. let's talk through what's bothering you.",
    "you have every right to feel this way. I'm listening.",
    "anger is a valid emotion. what's making you feel this way?",
];

const JOY_RESPONSES: &[&str] = &[
    "omg yesss I'm so happy for you!! keep shining babe ✨",
    "that's so cute, I'm proud of you!",
    "love this energy!! tell me more about what's making you happy!",
    "this is amazing!! you deserve all the good vibes 🌟",
    "yesss!! I'm here for this positive energy! what else is going well?",
];

const LOVE_RESPONSES: &[&str] = &[
    "aww that's so wholesome… sending you warm vibes 🤍",
    "you deserve softness, truly.",
    "this is so sweet. love seeing you appreciate the good things 💕",
    "your heart is beautiful. thank you for sharing this with me.",
    "gratitude looks good on you babe ✨",
];

const SURPRISE_RESPONSES: &[&str] = &[
    "whoa that sounds intense! want to tell me more?",
    "wait omg?? tell me what happened.",
    "okay wow!! that's unexpected. how are you feeling about it?",
    "no way!! tell me everything!",
    "that's wild! what's going through your mind right now?",
];

/// Pool used when an emotion has no pool of its own
pub const DEFAULT_POOL: &[&str] = SADNESS_RESPONSES;

/// Reply pool for an emotion
pub fn emotion_pool(emotion: Emotion) -> &'static [&'static str] {
    match emotion {
        Emotion::Sadness => SADNESS_RESPONSES,
        Emotion::Fear => FEAR_RESPONSES,
        Emotion::Anger => ANGER_RESPONSES,
        Emotion::Joy => JOY_RESPONSES,
        Emotion::Love => LOVE_RESPONSES,
        Emotion::Surprise => SURPRISE_RESPONSES,
        Emotion::Crisis => DEFAULT_POOL,
    }
}
