//! The ordered Socratic question plan.

use civic_rules::{Language, SlotKey};
use serde::Serialize;

/// A question probing one content slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SocraticQuestion {
    pub key: SlotKey,
    pub en: &'static str,
    pub pt: &'static str,
    /// Items required in lightning mode. Ignored for the summary slot.
    pub min_items: usize,
}

impl SocraticQuestion {
    /// Prompt text in the given language.
    pub fn text(&self, language: Language) -> &'static str {
        match language {
            Language::En => self.en,
            Language::Pt => self.pt,
        }
    }
}

/// Questions in the order they are asked. Deep mode raises list minimums.
pub static SOCRATIC_PLAN: [SocraticQuestion; 8] = [
    SocraticQuestion {
        key: SlotKey::Beliefs,
        en: "What beliefs about the current situation matter for this topic? List 1-3.",
        pt: "Quais crenças sobre a situação atual importam para este tema? Liste 1-3.",
        min_items: 1,
    },
    SocraticQuestion {
        key: SlotKey::Actions,
        en: "What actions would you take? List 1-3 actions.",
        pt: "Quais ações você tomaria? Liste 1-3 ações.",
        min_items: 1,
    },
    SocraticQuestion {
        key: SlotKey::Mechanisms,
        en: "Why would these actions work? Describe the causal path (1-2 items).",
        pt: "Por que essas ações funcionariam? Descreva o caminho causal (1-2 itens).",
        min_items: 1,
    },
    SocraticQuestion {
        key: SlotKey::Outcomes,
        en: "What outcomes do you expect in the short and long term?",
        pt: "Quais resultados você espera no curto e no longo prazo?",
        min_items: 1,
    },
    SocraticQuestion {
        key: SlotKey::Evidence,
        en: "What experiences or examples support your view?",
        pt: "Quais experiências ou exemplos apoiam sua visão?",
        min_items: 0,
    },
    SocraticQuestion {
        key: SlotKey::Tradeoffs,
        en: "What are the risks or tradeoffs of your plan?",
        pt: "Quais são os riscos ou trocas do seu plano?",
        min_items: 0,
    },
    SocraticQuestion {
        key: SlotKey::Metrics,
        en: "How would you measure success?",
        pt: "Como você mediria o sucesso?",
        min_items: 0,
    },
    SocraticQuestion {
        key: SlotKey::Summary,
        en: "Summarize your plan in 2-3 sentences in your own words.",
        pt: "Resuma seu plano em 2-3 frases com suas próprias palavras.",
        min_items: 0,
    },
];

/// Look up the question for a slot.
///
/// The plan is laid out in `SlotKey` declaration order.
pub fn question_for(key: SlotKey) -> &'static SocraticQuestion {
    &SOCRATIC_PLAN[key as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_covers_every_slot_in_order() {
        let keys: Vec<_> = SOCRATIC_PLAN.iter().map(|q| q.key).collect();
        assert_eq!(keys, SlotKey::ALL);
    }

    #[test]
    fn test_question_text_by_language() {
        let q = question_for(SlotKey::Metrics);
        assert_eq!(q.text(Language::En), "How would you measure success?");
        assert_eq!(q.text(Language::Pt), "Como você mediria o sucesso?");
    }
}
