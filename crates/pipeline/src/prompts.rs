//! Prompt construction for the three generation steps.
//!
//! Every prompt is a pure function of its inputs. The question step picks one
//! of four fixed templates by [`Pillar`]; the other steps share one template
//! each and only interpolate the pillar label.

use crate::{Pillar, Seed};

/// Number of titles requested from the title step.
pub const TITLE_COUNT: usize = 3;

/// Angle the question template takes for each pillar.
const BUILD_LOG_QUESTIONS: &str = "\
You are helping a practitioner turn a hands-on build experience into a Build Log article.
Ask about the concrete process: what they set out to build, which tools and models they used,
where things broke, how they worked around obstacles, and what measurable outcome they got.";

const LEADERSHIP_LENS_QUESTIONS: &str = "\
You are helping a leader turn an experience into a Leadership Lens article.
Ask about the people side: who was involved, how the team reacted, what decision had to be made,
how they built trust or handled resistance, and what they would tell another leader.";

const META_SKILL_QUESTIONS: &str = "\
You are helping a learner turn an insight into a Meta-Skill article.
Ask about learning itself: what pattern they noticed, which mental model changed,
how they practised, what they would do differently, and how the skill transfers to other domains.";

const FIELD_NOTE_QUESTIONS: &str = "\
You are helping an observer turn a moment into a short Field Note article.
Ask about the observation: where and when it happened, what context mattered,
what surprised them, what they think it signals, and what readers should watch for.";

/// Returns the fixed question template for `pillar`.
///
/// Each pillar maps to exactly one template and no two pillars share one.
pub fn question_template(pillar: Pillar) -> &'static str {
    match pillar {
        Pillar::BuildLog => BUILD_LOG_QUESTIONS,
        Pillar::LeadershipLens => LEADERSHIP_LENS_QUESTIONS,
        Pillar::MetaSkill => META_SKILL_QUESTIONS,
        Pillar::FieldNote => FIELD_NOTE_QUESTIONS,
    }
}

/// Prompt for the title step: exactly [`TITLE_COUNT`] short titles, one per line.
pub fn title_prompt(seed: &Seed) -> String {
    format!(
        "Suggest exactly {count} short, compelling article titles for a {pillar} piece \
         based on this story seed.\n\n\
         Story seed: {content}\n\n\
         Reply with the {count} titles only, one per line, with no numbering, quotes, \
         or extra commentary.",
        count = TITLE_COUNT,
        pillar = seed.pillar,
        content = seed.content,
    )
}

/// Prompt for the question step, using the pillar's template.
pub fn question_prompt(seed: &Seed, title: &str) -> String {
    format!(
        "{template}\n\n\
         Working title: {title}\n\
         Story seed: {content}\n\n\
         Write between 5 and 10 open-ended questions that will draw out the details \
         needed to write this article. Reply with one question per line, each ending \
         with a question mark, and nothing else.",
        template = question_template(seed.pillar),
        content = seed.content,
    )
}

/// Prompt for the draft step.
///
/// `answered` is the ordered list of selected question/answer pairs; only
/// those pairs are embedded.
pub fn draft_prompt(seed: &Seed, title: &str, answered: &[(String, String)]) -> String {
    let interview = answered
        .iter()
        .map(|(q, a)| format!("Q: {q}\nA: {a}"))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Write a first-person narrative draft of 500 to 800 words for a {pillar} article \
         titled \"{title}\".\n\n\
         Original story seed: {content}\n\n\
         Interview notes:\n{interview}\n\n\
         Use the interview answers as the factual backbone. Write in a warm, direct voice, \
         open with a hook, and close with a takeaway for the reader. Return only the \
         article body.",
        pillar = seed.pillar,
        content = seed.content,
    )
}
