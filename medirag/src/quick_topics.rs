use crate::session::ConversationHistory;

/// Checked in order against everything the user has said; the first hit wins.
pub const MEDICATION_KEYWORDS: &[(&str, &str)] = &[
    ("allergy", "What OTC medications help with allergies?"),
    (
        "rash",
        "What OTC treatments are available for skin rashes like poison ivy?",
    ),
    ("fever", "What OTC medications can help reduce fever?"),
    (
        "pain",
        "What are some common pain relievers available over the counter?",
    ),
    ("headache", "What are the best OTC medications for headaches?"),
    ("cold", "What are good OTC remedies for cold and flu symptoms?"),
    ("cough", "What over-the-counter medications relieve coughing?"),
    ("itch", "What can relieve itchy skin or insect bites?"),
];

pub const NO_HISTORY_MEDICATIONS: &str =
    "What are some commonly used over-the-counter medications?";

pub const WARNING_SIGNS: &str = "Seek medical help if you experience:
- Fever over 102°F (39°C)
- Chest pain or pressure
- Shortness of breath
- Severe headaches
- Confusion or disorientation";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuickTopic {
    ColdAndFlu,
    Medications,
    WellnessTips,
}

impl QuickTopic {
    pub const ALL: [QuickTopic; 3] = [
        QuickTopic::ColdAndFlu,
        QuickTopic::Medications,
        QuickTopic::WellnessTips,
    ];

    pub fn label(self) -> &'static str {
        match self {
            QuickTopic::ColdAndFlu => "Cold & Flu",
            QuickTopic::Medications => "Medications",
            QuickTopic::WellnessTips => "Wellness Tips",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.label() == label)
    }

    /// Canonical follow-up question for this topic. Only `Medications` looks at the history.
    pub fn resolve(self, history: &ConversationHistory) -> String {
        match self {
            QuickTopic::ColdAndFlu => "What are the common symptoms of a cold?".to_string(),
            QuickTopic::WellnessTips => {
                "Share some daily wellness and self-care habits.".to_string()
            }
            QuickTopic::Medications => resolve_medications(history),
        }
    }
}

fn resolve_medications(history: &ConversationHistory) -> String {
    if history.is_empty() {
        return NO_HISTORY_MEDICATIONS.to_string();
    }
    let said = history.user_inputs().collect::<Vec<_>>().join(" ").to_lowercase();
    MEDICATION_KEYWORDS
        .iter()
        .find(|(keyword, _)| said.contains(keyword))
        .map(|(_, question)| question.to_string())
        .unwrap_or_else(|| {
            format!(
                "Based on the user's prior message: '{}', suggest appropriate over-the-counter medications.",
                said
            )
        })
}
