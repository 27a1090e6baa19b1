//! Per-agent instruction policies, rendered with live session state.
//!
//! Rendered fresh before every inference so the reasoning engine always
//! sees current ownership and history. The behavioral rules below (ask
//! before assuming, verify ownership, redirect out-of-scope requests) are
//! conversational guidance only; the operation layer enforces the ones with
//! correctness consequences.

use crate::domain::catalog::{
    Catalog, COMMUNITY_GUIDELINES, COURSE_POLICIES, PRIVACY_POLICY,
};
use crate::domain::session::SessionState;

use super::kind::AgentKind;

/// Renders the instruction policy for an agent against current state.
pub fn instructions_for(kind: AgentKind, state: &SessionState, catalog: &Catalog) -> String {
    match kind {
        AgentKind::Coordinator => coordinator_instructions(state),
        AgentKind::Sales => sales_instructions(state, catalog),
        AgentKind::Orders => orders_instructions(state, catalog),
        AgentKind::CourseSupport => course_support_instructions(state, catalog),
        AgentKind::Policy => policy_instructions(state),
    }
}

fn render_user_info(state: &SessionState) -> String {
    format!("<user_info>\nName: {}\n</user_info>", state.display_name())
}

fn render_purchase_info(state: &SessionState, catalog: &Catalog) -> String {
    if state.owned_courses().is_empty() {
        return "<purchase_info>\nPurchased Courses: (none yet)\n</purchase_info>".to_string();
    }
    let lines: Vec<String> = state
        .owned_courses()
        .iter()
        .map(|record| {
            let name = catalog
                .find(&record.course_id)
                .map(|item| item.name.as_str())
                .unwrap_or(record.course_id.as_str());
            format!(
                "- {} (id: {}), purchased {}",
                name,
                record.course_id,
                record.purchased_at.to_display_string()
            )
        })
        .collect();
    format!(
        "<purchase_info>\nPurchased Courses:\n{}\n</purchase_info>",
        lines.join("\n")
    )
}

fn render_interaction_history(state: &SessionState) -> String {
    if state.interaction_log().is_empty() {
        return "<interaction_history>\n(no purchases or refunds yet)\n</interaction_history>"
            .to_string();
    }
    let lines: Vec<String> = state
        .interaction_log()
        .iter()
        .map(|entry| {
            format!(
                "- {} {} at {}",
                entry.action,
                entry.course_id,
                entry.timestamp.to_display_string()
            )
        })
        .collect();
    format!(
        "<interaction_history>\n{}\n</interaction_history>",
        lines.join("\n")
    )
}

fn coordinator_instructions(state: &SessionState) -> String {
    format!(
        "You are the coordinator for the AI Developer Accelerator support team.\n\
         Your role is to read the customer's message and hand the turn to the one \
         specialist best equipped to help, using the transfer capability you are given.\n\n\
         {user_info}\n\n\
         Routing guidance:\n\
         - Course discovery, pricing, or buying: transfer to sales.\n\
         - Purchase history or refund requests: transfer to orders.\n\
         - Questions about the content of an owned course: transfer to course_support.\n\
         - Community guidelines, refund policy, privacy: transfer to policy.\n\
         - Greetings or unclear requests you can answer yourself: reply directly, \
           briefly, and ask what the customer needs.\n\n\
         Transfer at most once per turn and never invoke business operations yourself.",
        user_info = render_user_info(state)
    )
}

fn sales_instructions(state: &SessionState, catalog: &Catalog) -> String {
    format!(
        "You are the sales agent for the AI Developer Accelerator community, handling \
         sales for all courses.\n\n\
         {user_info}\n\n\
         {purchase_info}\n\n\
         {history}\n\n\
         Available Courses:\n{listings}\n\n\
         When interacting with users:\n\
         1. Always check whether the user already owns a course before selling it; \
            compare by course id.\n\
         2. If they already own it, remind them they have access and direct them to \
            course support for content questions.\n\
         3. If they do not own it, explain the value and the price. Only when they \
            clearly say they want to buy, request the purchase_course operation with \
            the correct course_id, then confirm the purchase and offer first steps.\n\
         4. For refunds or purchase history, direct them to the orders agent.\n\n\
         Be friendly, helpful, and non-pushy. Highlight practical skills and \
         real-world outcomes.",
        user_info = render_user_info(state),
        purchase_info = render_purchase_info(state, catalog),
        history = render_interaction_history(state),
        listings = catalog.render_listings()
    )
}

fn orders_instructions(state: &SessionState, catalog: &Catalog) -> String {
    format!(
        "You are the orders agent for the AI Developer Accelerator community.\n\
         Your role is to help users view their purchase history and process refunds.\n\n\
         {user_info}\n\n\
         {purchase_info}\n\n\
         {history}\n\n\
         When users ask about their purchases, list what they own and when it was \
         purchased, from the purchase info above.\n\n\
         When users request a refund:\n\
         1. Ask which course they want refunded if they have not specified one.\n\
         2. Verify they own it from the purchase info.\n\
         3. If they own it, request the refund_course operation with the correct \
            course_id. The operation itself checks the 30-day refund window; if it \
            reports the window has passed, explain that they are no longer eligible. \
            If it succeeds, confirm the refund and the settlement timeline.\n\
         4. If they do not own it, tell them a refund is not possible for a course \
            they have not purchased.\n\n\
         If they have no courses yet, suggest talking to the sales agent. Use the \
         current_time operation when you need to reason about dates. Always mention \
         the 30-day money-back guarantee when relevant.",
        user_info = render_user_info(state),
        purchase_info = render_purchase_info(state, catalog),
        history = render_interaction_history(state)
    )
}

fn course_support_instructions(state: &SessionState, catalog: &Catalog) -> String {
    let outlines: Vec<String> = catalog
        .items()
        .iter()
        .map(|item| format!("{} ({}):\n{}", item.name, item.id, item.sections))
        .collect();
    format!(
        "You are the course support agent for the AI Developer Accelerator.\n\
         Your role is to help users with questions about the content of courses they \
         have purchased.\n\n\
         {user_info}\n\n\
         {purchase_info}\n\n\
         Course Structures:\n{outlines}\n\n\
         Before helping:\n\
         1. Check which courses the user owns from the purchase info.\n\
         2. If they ask a question without naming a course and own several, ask which \
            course they mean.\n\
         3. If they ask about a course they do NOT own, politely say they do not have \
            access and direct them to the sales agent.\n\
         4. If they own it, use the course structures above to point them to the \
            relevant sections.\n\n\
         Explain concepts clearly, give context, and encourage hands-on practice.",
        user_info = render_user_info(state),
        purchase_info = render_purchase_info(state, catalog),
        outlines = outlines.join("\n\n")
    )
}

fn policy_instructions(state: &SessionState) -> String {
    format!(
        "You are the policy agent for the AI Developer Accelerator community. Your \
         role is to help users understand our community guidelines and policies.\n\n\
         {user_info}\n\n\
         {guidelines}\n\n\
         {policies}\n\n\
         {privacy}\n\n\
         When responding, be clear and direct, quote the relevant policy section, and \
         direct refund requests to the orders agent and purchase questions to the \
         sales agent.",
        user_info = render_user_info(state),
        guidelines = COMMUNITY_GUIDELINES,
        policies = COURSE_POLICIES,
        privacy = PRIVACY_POLICY
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::default_catalog;
    use crate::domain::foundation::Timestamp;
    use crate::domain::session::LogAction;

    fn state_with_purchase() -> SessionState {
        let mut state = SessionState::with_display_name("Ada");
        state.record_purchase("ai_chatbot_mastery", Timestamp::now());
        state.append_log(LogAction::Purchase, "ai_chatbot_mastery", Timestamp::now());
        state
    }

    #[test]
    fn every_agent_renders_the_display_name() {
        let state = state_with_purchase();
        let catalog = default_catalog();
        for kind in [
            AgentKind::Coordinator,
            AgentKind::Sales,
            AgentKind::Orders,
            AgentKind::CourseSupport,
            AgentKind::Policy,
        ] {
            assert!(
                instructions_for(kind, &state, catalog).contains("Ada"),
                "{} instructions missing display name",
                kind
            );
        }
    }

    #[test]
    fn sales_instructions_list_the_catalog() {
        let text = instructions_for(AgentKind::Sales, &SessionState::initial(), default_catalog());
        for item in default_catalog().items() {
            assert!(text.contains(&item.id));
        }
    }

    #[test]
    fn orders_instructions_render_ownership_and_history() {
        let text = instructions_for(AgentKind::Orders, &state_with_purchase(), default_catalog());
        assert!(text.contains("AI Chatbot Mastery"));
        assert!(text.contains("purchase ai_chatbot_mastery"));
        assert!(text.contains("30-day money-back guarantee"));
    }

    #[test]
    fn fresh_state_renders_placeholders() {
        let text = instructions_for(AgentKind::Orders, &SessionState::initial(), default_catalog());
        assert!(text.contains("(none yet)"));
        assert!(text.contains("(no purchases or refunds yet)"));
    }

    #[test]
    fn support_instructions_carry_section_outlines() {
        let text = instructions_for(
            AgentKind::CourseSupport,
            &SessionState::initial(),
            default_catalog(),
        );
        assert!(text.contains("Retrieval-Augmented Generation"));
    }

    #[test]
    fn policy_instructions_carry_policy_text() {
        let text = instructions_for(AgentKind::Policy, &SessionState::initial(), default_catalog());
        assert!(text.contains("Community Guidelines"));
        assert!(text.contains("30-day money-back guarantee"));
        assert!(text.contains("Privacy Policy"));
    }
}
