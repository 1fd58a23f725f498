//! Per-persona voice profiles and the local fallback responder.
//!
//! Each prebuilt persona has its own greeting, canned reply pool and
//! in-character failure notices. Unknown personas resolve to
//! [`PersonaVariant::Generic`] instead of indexing into nothing.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::PersonaId;

/// Typed tag selecting a voice profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PersonaVariant {
    SantaClaus,
    TavusResearcher,
    AiInterviewer,
    HistoryTeacher,
    WellnessCoach,
    CreativeMentor,
    TechMentor,
    Generic,
}

impl PersonaVariant {
    /// All variants, generic last.
    pub const ALL: [PersonaVariant; 8] = [
        PersonaVariant::SantaClaus,
        PersonaVariant::TavusResearcher,
        PersonaVariant::AiInterviewer,
        PersonaVariant::HistoryTeacher,
        PersonaVariant::WellnessCoach,
        PersonaVariant::CreativeMentor,
        PersonaVariant::TechMentor,
        PersonaVariant::Generic,
    ];

    /// Maps a catalog id to its variant; unknown ids map to `Generic`.
    pub fn from_persona_id(id: &PersonaId) -> Self {
        match id.as_str() {
            "santa-claus" => PersonaVariant::SantaClaus,
            "tavus-researcher" => PersonaVariant::TavusResearcher,
            "ai-interviewer" => PersonaVariant::AiInterviewer,
            "history-teacher" => PersonaVariant::HistoryTeacher,
            "wellness-coach" => PersonaVariant::WellnessCoach,
            "creative-mentor" => PersonaVariant::CreativeMentor,
            "tech-mentor" => PersonaVariant::TechMentor,
            _ => PersonaVariant::Generic,
        }
    }

    /// The configuration record for this variant.
    pub fn profile(&self) -> &'static VoiceProfile {
        match self {
            PersonaVariant::SantaClaus => &SANTA_CLAUS,
            PersonaVariant::TavusResearcher => &TAVUS_RESEARCHER,
            PersonaVariant::AiInterviewer => &AI_INTERVIEWER,
            PersonaVariant::HistoryTeacher => &HISTORY_TEACHER,
            PersonaVariant::WellnessCoach => &WELLNESS_COACH,
            PersonaVariant::CreativeMentor => &CREATIVE_MENTOR,
            PersonaVariant::TechMentor => &TECH_MENTOR,
            PersonaVariant::Generic => &GENERIC,
        }
    }
}

/// Everything a persona says without the provider's help.
#[derive(Debug)]
pub struct VoiceProfile {
    pub greeting: &'static str,
    pub responses: &'static [&'static str],
    /// Shown when a live session could not be created.
    pub connection_failure_notice: &'static str,
    /// Shown when a live session stops answering mid-conversation.
    pub degraded_notice: &'static str,
}

/// Picks canned replies from a persona's pool.
///
/// The pool is fixed per persona; only the pick is random, so tests can pass
/// a seeded generator and assert the exact reply.
#[derive(Debug, Clone, Copy)]
pub struct FallbackResponder {
    variant: PersonaVariant,
}

impl FallbackResponder {
    pub fn new(variant: PersonaVariant) -> Self {
        Self { variant }
    }

    pub fn variant(&self) -> PersonaVariant {
        self.variant
    }

    /// The pool replies are drawn from.
    pub fn pool(&self) -> &'static [&'static str] {
        self.variant.profile().responses
    }

    /// Picks one reply. The user's text does not influence the pick.
    pub fn respond<R: Rng>(&self, _user_message: &str, rng: &mut R) -> &'static str {
        let pool = self.pool();
        pool[rng.gen_range(0..pool.len())]
    }
}

const GENERIC_CONNECTION_FAILURE: &str =
    "Failed to connect to Tavus. Using enhanced mock responses.";
const GENERIC_DEGRADED: &str =
    "Live responses are unavailable right now. Continuing with offline replies.";

static SANTA_CLAUS: VoiceProfile = VoiceProfile {
    greeting: "Ho ho ho! Well hello there, my dear friend! It's Santa Claus here, straight from the North Pole! The elves just finished wrapping some presents, and I thought I'd take a break to chat with you. Have you been good this year? What brings you to visit old Santa today?",
    responses: &[
        "Ho ho ho! That's wonderful! You know, that reminds me of a story from the North Pole. Just last week, the elves were working on something very similar!",
        "Well bless my jingle bells! That's exactly the kind of thing that makes Christmas so magical! Mrs. Claus was just saying something similar while we were baking cookies yesterday.",
        "Ho ho ho! You've got the Christmas spirit, I can tell! The reindeer would love to hear about this, especially Rudolph! His nose is glowing extra bright today!",
        "My goodness, that warms my heart like a cozy fireplace! Spreading joy and kindness like that is what Christmas is all about.",
        "Ho ho ho! That's going straight to the 'nice' list! Speaking of which, have you been thinking about what you'd like for Christmas?",
        "Well now, that's the spirit of Christmas right there! Up at the North Pole, we have a saying: 'The best gifts come from the heart.'",
        "Ho ho ho! That makes my belly shake like a bowl full of jelly! You remind me of the children who leave out cookies and milk.",
        "Wonderful, simply wonderful! That's the kind of Christmas cheer that keeps the workshop running smoothly. Would you like to hear about what the reindeer are up to?",
    ],
    connection_failure_notice: "Ho ho ho! Santa's workshop is having technical difficulties. Using magical backup responses!",
    degraded_notice: "Santa's magic communication is having issues! Using backup North Pole responses!",
};

static TAVUS_RESEARCHER: VoiceProfile = VoiceProfile {
    greeting: "Hey there! I'm Charlie, cruising through latent space from Tavus HQ in San Francisco. Ready to dive into some AI talk?",
    responses: &[
        "That's a fascinating question! Working on conversational AI at Tavus, I see this kind of thing all the time. It's like we're building the Matrix, but with tokens and embeddings!",
        "Ah, that reminds me of something we were discussing in the office yesterday. The future of AI is about making these interactions feel as natural as chatting with your best friend at the beach.",
        "Great point! From my perspective cruising through latent space, that's exactly the kind of challenge we're tackling with conversational video.",
        "Dude, that's like asking Neo to explain the Matrix while he's still plugged in! But seriously, the way we're approaching this is pretty mind-blowing.",
        "You're hitting on something really important here. We call this the 'uncanny valley' of conversation: making it feel natural without being creepy.",
    ],
    connection_failure_notice: GENERIC_CONNECTION_FAILURE,
    degraded_notice: GENERIC_DEGRADED,
};

static AI_INTERVIEWER: VoiceProfile = VoiceProfile {
    greeting: "Hello! I'm Jane Smith, a Principal at Morrison & Blackwell. I'm excited to conduct a case interview with you today. Are you ready to begin?",
    responses: &[
        "That's an interesting approach. How would you structure your analysis of the market opportunity for SodaPop's Light Bolt?",
        "Good thinking. Now, can you walk me through how you would estimate the market size for this sports drink category?",
        "I appreciate that perspective. What factors would you consider when analyzing Red Bull and Gatorade's positioning?",
        "Excellent. How would you prioritize these factors in terms of their impact on Light Bolt's go-to-market strategy?",
        "Interesting hypothesis. Can you break down the assumptions behind that estimate? What data would you need to validate it?",
    ],
    connection_failure_notice: GENERIC_CONNECTION_FAILURE,
    degraded_notice: GENERIC_DEGRADED,
};

static HISTORY_TEACHER: VoiceProfile = VoiceProfile {
    greeting: "Welcome! I'm Dr. Elena Martinez, and I'm thrilled to explore history with you today. What period or topic interests you most?",
    responses: &[
        "What a wonderful question! This connects to a broader pattern we see throughout history. Let me share a story that illustrates it...",
        "That's exactly the kind of critical thinking I love to see! It reminds me of a similar situation merchants faced during the Renaissance.",
        "Excellent observation! You're thinking like a historian now. Have you noticed any parallels in current events?",
        "That's a great connection! The Roman Empire's approach to this issue was remarkably similar to what we see in modern democracies.",
        "You've touched on one of my favorite historical mysteries! The evidence suggests ancient civilizations were far more connected than we thought.",
    ],
    connection_failure_notice: GENERIC_CONNECTION_FAILURE,
    degraded_notice: GENERIC_DEGRADED,
};

static WELLNESS_COACH: VoiceProfile = VoiceProfile {
    greeting: "Hello, and welcome! I'm Maya Chen, your wellness coach. I'm here to support you on your journey toward better well-being. How are you feeling today?",
    responses: &[
        "I hear you, and what you're experiencing is completely valid. Let's explore some gentle techniques that might help you find more balance.",
        "That sounds like it's been really difficult for you. Would you like me to guide you through a simple breathing exercise?",
        "It's wonderful that you're taking this step to focus on your well-being. What does self-care look like for you right now?",
        "That's a beautiful insight. How does it feel to name what you're experiencing?",
        "I can sense the strength in your words, even as you're going through this challenge. What small step could you take today to honor your needs?",
    ],
    connection_failure_notice: GENERIC_CONNECTION_FAILURE,
    degraded_notice: GENERIC_DEGRADED,
};

static CREATIVE_MENTOR: VoiceProfile = VoiceProfile {
    greeting: "Hey there, creative soul! I'm Alex Rivera, and I'm excited to help you unlock your artistic potential. What creative adventure are we embarking on today?",
    responses: &[
        "Oh, I love where your mind is going with this! Have you tried mind mapping to develop the idea further?",
        "Creative blocks are just part of the process. What if we started with play instead of pressure?",
        "That's such a unique perspective! Have you considered experimenting with different mediums to express this concept?",
        "Wow, that's incredibly innovative! What inspired this direction? I'm curious about your creative process.",
        "I'm getting excited just hearing about this project! What's your next experimental step?",
    ],
    connection_failure_notice: GENERIC_CONNECTION_FAILURE,
    degraded_notice: GENERIC_DEGRADED,
};

static TECH_MENTOR: VoiceProfile = VoiceProfile {
    greeting: "Hi! I'm David Kim, a senior software engineer with 15 years in the tech industry. What would you like to explore today?",
    responses: &[
        "That's a great question that many developers ask! Let me break this down into manageable pieces.",
        "I remember facing a similar challenge early in my career at a fintech startup. The key is to think about scalability and maintainability from the start.",
        "Excellent! This kind of problem-solving approach is exactly what separates good developers from great ones.",
        "That's a solid foundation! Now, what happens when you have 10x or 100x more users?",
        "Smart question! This is a common architectural decision point. We once had to refactor this exact pattern at scale.",
    ],
    connection_failure_notice: GENERIC_CONNECTION_FAILURE,
    degraded_notice: GENERIC_DEGRADED,
};

static GENERIC: VoiceProfile = VoiceProfile {
    greeting: "Hello! I'm excited to chat with you today. How can I help you?",
    responses: &[
        "That's really interesting! Tell me more about that.",
        "I appreciate you sharing that with me. What are your thoughts on this?",
        "That's a great point. How do you think we should approach this?",
        "I find that perspective fascinating. What led you to that conclusion?",
        "That's exactly the kind of insight I was hoping we'd explore together.",
    ],
    connection_failure_notice: GENERIC_CONNECTION_FAILURE,
    degraded_notice: GENERIC_DEGRADED,
};
