//! Intent classification for a representative query.
//!
//! Keyword tests run in a fixed priority order: student, business, job,
//! then a bare location. The first hit sets the type and a base
//! confidence; agreement between the caller's context and the entities
//! found in the text adds to it.

use crate::config::lexicon::{mentions_any, Lexicon};
use crate::extract::context::{extract_field, extract_location};
use crate::text::contains_term;
use crate::types::{EducationLevel, Entities, EntityType, Intent, IntentType, QueryContext};

const UNDERGRADUATE_TERMS: &[&str] = &["undergraduate", "undergraduates", "bachelor", "bachelors"];
const GRADUATE_TERMS: &[&str] = &[
    "graduate",
    "graduates",
    "postgraduate",
    "postgraduates",
    "master",
    "masters",
    "phd",
];
const INDIVIDUAL_TERMS: &[&str] = &["student", "students", "individual", "individuals"];
const BUSINESS_TERMS: &[&str] = &["business", "businesses", "company", "companies"];

const AGREEMENT_BONUS: u8 = 10;
const MAX_CONFIDENCE: u8 = 100;

fn mentions(text: &str, terms: &[&str]) -> bool {
    terms.iter().any(|t| contains_term(text, t))
}

/// Named entities in `text`, falling back to `context` where the text is
/// silent.
pub fn extract_entities(text: &str, context: &QueryContext, lexicon: &Lexicon) -> Entities {
    let education_level = if mentions(text, UNDERGRADUATE_TERMS) {
        Some(EducationLevel::Undergraduate)
    } else if mentions(text, GRADUATE_TERMS) {
        Some(EducationLevel::Graduate)
    } else {
        None
    };

    let entity_type = if mentions(text, INDIVIDUAL_TERMS) {
        Some(EntityType::Individual)
    } else if mentions(text, BUSINESS_TERMS) {
        Some(EntityType::Business)
    } else {
        None
    };

    Entities {
        location: extract_location(text, lexicon).or_else(|| context.location.clone()),
        field: extract_field(text, lexicon).or_else(|| context.field_of_study.clone()),
        education_level,
        entity_type,
    }
}

/// Classify `text` and score the confidence of the label.
pub fn detect_intent(text: &str, context: &QueryContext, lexicon: &Lexicon) -> Intent {
    let entities = extract_entities(text, context, lexicon);
    let text_location = extract_location(text, lexicon);

    let (intent_type, base) = if mentions_any(text, &lexicon.student_keywords) {
        (IntentType::StudentSearch, 80)
    } else if mentions_any(text, &lexicon.business_keywords) {
        (IntentType::BusinessSearch, 75)
    } else if mentions_any(text, &lexicon.job_keywords) {
        (IntentType::JobSearch, 70)
    } else if text_location.is_some() {
        (IntentType::LocationSearch, 70)
    } else {
        (IntentType::Mixed, 50)
    };

    let mut confidence: u8 = base;
    if agrees(context.location.as_deref(), text_location.as_deref()) {
        confidence = confidence.saturating_add(AGREEMENT_BONUS);
    }
    if agrees(
        context.field_of_study.as_deref(),
        extract_field(text, lexicon).as_deref(),
    ) {
        confidence = confidence.saturating_add(AGREEMENT_BONUS);
    }
    if context.student_only && intent_type == IntentType::StudentSearch {
        confidence = confidence.saturating_add(AGREEMENT_BONUS);
    }

    Intent {
        intent_type,
        confidence: confidence.min(MAX_CONFIDENCE),
        entities,
    }
}

fn agrees(from_context: Option<&str>, from_text: Option<&str>) -> bool {
    match (from_context, from_text) {
        (Some(a), Some(b)) => a.trim().eq_ignore_ascii_case(b.trim()),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use test_case::test_case;

    fn classify(text: &str) -> Intent {
        detect_intent(text, &QueryContext::default(), &Lexicon::default())
    }

    #[test_case("ICT students", IntentType::StudentSearch, 80 ; "student")]
    #[test_case("bakeries and shops", IntentType::BusinessSearch, 75 ; "business")]
    #[test_case("software internships", IntentType::JobSearch, 70 ; "job")]
    #[test_case("cafes in kandy", IntentType::LocationSearch, 70 ; "location")]
    #[test_case("stuff", IntentType::Mixed, 50 ; "mixed default")]
    fn classification_cases(text: &str, expected: IntentType, confidence: u8) {
        let intent = classify(text);
        assert_eq!(intent.intent_type, expected);
        assert_eq!(intent.confidence, confidence);
    }

    #[test]
    fn student_beats_business_in_priority_order() {
        assert_eq!(
            classify("students who run a business").intent_type,
            IntentType::StudentSearch
        );
    }

    #[test]
    fn agreement_raises_confidence() {
        let ctx = QueryContext::default()
            .with_location("Kandy")
            .with_field("ICT")
            .student_only(true);
        let intent = detect_intent("ICT students in kandy", &ctx, &Lexicon::default());
        // 80 base + location + field + student agreement, capped
        assert_eq!(intent.confidence, 100);
    }

    #[test]
    fn disagreement_adds_nothing() {
        let ctx = QueryContext::default().with_location("galle");
        let intent = detect_intent("shops in kandy", &ctx, &Lexicon::default());
        assert_eq!(intent.intent_type, IntentType::BusinessSearch);
        assert_eq!(intent.confidence, 75);
    }

    #[test]
    fn entities_extracted_from_text() {
        let intent = classify("Computer Science undergraduates near Galle");
        assert_eq!(intent.entities.field.as_deref(), Some("ICT"));
        assert_eq!(intent.entities.location.as_deref(), Some("Galle"));
        assert_eq!(
            intent.entities.education_level,
            Some(EducationLevel::Undergraduate)
        );
    }

    #[test_case("phd students", Some(EducationLevel::Graduate) ; "phd")]
    #[test_case("masters programmes", Some(EducationLevel::Graduate) ; "masters")]
    #[test_case("bachelor students", Some(EducationLevel::Undergraduate) ; "bachelor")]
    #[test_case("shops", None ; "none")]
    fn education_level_cases(text: &str, expected: Option<EducationLevel>) {
        assert_eq!(classify(text).entities.education_level, expected);
    }

    #[test_case("students", Some(EntityType::Individual) ; "individual")]
    #[test_case("software companies", Some(EntityType::Business) ; "business")]
    #[test_case("cafes", None ; "none")]
    fn entity_type_cases(text: &str, expected: Option<EntityType>) {
        assert_eq!(classify(text).entities.entity_type, expected);
    }

    #[test]
    fn entities_fall_back_to_context() {
        let ctx = QueryContext::default().with_location("matara").with_field("Law");
        let intent = detect_intent("students", &ctx, &Lexicon::default());
        assert_eq!(intent.entities.location.as_deref(), Some("matara"));
        assert_eq!(intent.entities.field.as_deref(), Some("Law"));
    }

    proptest! {
        #[test]
        fn confidence_always_bounded(text in "\\PC{0,60}", student in any::<bool>()) {
            let ctx = QueryContext::default()
                .with_location("kandy")
                .with_field("ICT")
                .student_only(student);
            let intent = detect_intent(&text, &ctx, &Lexicon::default());
            prop_assert!(intent.confidence <= 100);
        }
    }
}
