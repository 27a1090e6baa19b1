//! Catalog aggregate - ordered, id-indexed collection of course items.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use super::item::CourseItem;

/// Errors raised while loading a catalog from file.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse catalog file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("catalog item '{id}' has non-positive price")]
    NonPositivePrice { id: String },

    #[error("duplicate catalog item id '{id}'")]
    DuplicateId { id: String },
}

/// Immutable course catalog.
///
/// Items keep their declared order (the order they are listed to users).
/// Lookup is by course id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    items: Vec<CourseItem>,
}

impl Catalog {
    /// Builds a catalog from items, validating prices and id uniqueness.
    pub fn new(items: Vec<CourseItem>) -> Result<Self, CatalogError> {
        let mut seen = std::collections::HashSet::new();
        for item in &items {
            if item.price == 0 {
                return Err(CatalogError::NonPositivePrice {
                    id: item.id.clone(),
                });
            }
            if !seen.insert(item.id.clone()) {
                return Err(CatalogError::DuplicateId {
                    id: item.id.clone(),
                });
            }
        }
        Ok(Self { items })
    }

    /// Loads a catalog from a YAML file (a list of course items).
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let yaml = std::fs::read_to_string(path)?;
        let items: Vec<CourseItem> = serde_yaml::from_str(&yaml)?;
        Self::new(items)
    }

    /// Finds an item by id.
    pub fn find(&self, course_id: &str) -> Option<&CourseItem> {
        self.items.iter().find(|item| item.id == course_id)
    }

    /// Returns true if the id exists in the catalog.
    pub fn contains(&self, course_id: &str) -> bool {
        self.find(course_id).is_some()
    }

    /// Returns all items in declared order.
    pub fn items(&self) -> &[CourseItem] {
        &self.items
    }

    /// Renders the full catalog as listing text for agent instructions.
    pub fn render_listings(&self) -> String {
        self.items
            .iter()
            .map(CourseItem::render_listing)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// The built-in course catalog, used when no override file is configured.
pub fn default_catalog() -> &'static Catalog {
    static CATALOG: Lazy<Catalog> = Lazy::new(|| {
        Catalog::new(builtin_items()).expect("built-in catalog is valid")
    });
    &CATALOG
}

fn builtin_items() -> Vec<CourseItem> {
    vec![
        CourseItem {
            id: "ai_marketing_platform".to_string(),
            name: "Fullstack AI Marketing Platform".to_string(),
            price: 149,
            value_proposition: "Learn to build AI-powered marketing automation apps".to_string(),
            includes: "6 weeks of group support with weekly coaching calls".to_string(),
            sections: "\
1. Introduction & Goals
2. Architecture & Tech Stack
3. Data Models & Views
4. Environment Setup
5. NextJS Crash Course & App Stub
6. Auth, Database, and Storage Setup
7. Asset Processing & Prompt Management
8. AI Content Generation & Stripe Integration
9. Landing & Pricing Pages"
                .to_string(),
        },
        CourseItem {
            id: "ai_automation_engineer".to_string(),
            name: "AI Automation Engineer Bootcamp".to_string(),
            price: 199,
            value_proposition: "Master AI workflow automation for real businesses".to_string(),
            includes: "Automation templates, project-based training, community support"
                .to_string(),
            sections: "\
1. Introduction to AI Automation
2. Core Tools: Zapier, Make, LangChain
3. Building Your First Agent
4. Advanced Agentic Workflows
5. Scraping and Data Extraction
6. Integrating with Business Systems (CRM, Email)
7. Project: Automated Content Pipeline"
                .to_string(),
        },
        CourseItem {
            id: "ai_chatbot_mastery".to_string(),
            name: "AI Chatbot Mastery".to_string(),
            price: 129,
            value_proposition: "Build advanced LLM chatbots with memory, tools, and actions"
                .to_string(),
            includes: "Deployment training + prebuilt bot templates".to_string(),
            sections: "\
1. Chatbot Fundamentals & LLM Basics
2. Building with LangChain & Vercel AI SDK
3. Memory and Conversation History
4. Tool Use and Function Calling
5. Retrieval-Augmented Generation (RAG)
6. Deploying to Production
7. Project: Customer Support Bot"
                .to_string(),
        },
        CourseItem {
            id: "ai_saas_builder".to_string(),
            name: "AI SaaS Builder Accelerator".to_string(),
            price: 249,
            value_proposition: "Learn to build and launch your own AI SaaS startup".to_string(),
            includes: "Product planning, payments, auth, billing, and deployment".to_string(),
            sections: "\
1. SaaS Fundamentals & Product Planning
2. Tech Stack: Next.js, Stripe, and Supabase
3. User Authentication and Onboarding
4. Subscription Billing with Stripe
5. Core Application Logic
6. Multi-tenancy and Database Design
7. Deployment and Scaling"
                .to_string(),
        },
        CourseItem {
            id: "prompt_engineering_deep_dive".to_string(),
            name: "Prompt Engineering Deep Dive".to_string(),
            price: 79,
            value_proposition: "Master advanced prompting, agents, and LLM optimization"
                .to_string(),
            includes: "100+ prompt patterns and real-world examples".to_string(),
            sections: "\
1. Foundations of Prompting
2. Advanced Techniques: Chain-of-Thought, Self-Consistency
3. Structuring Prompts for Complex Tasks
4. Agent Design and Autonomous Systems
5. Fine-tuning vs. Prompting
6. Evaluating LLM Outputs"
                .to_string(),
        },
        CourseItem {
            id: "ds_llm_foundations".to_string(),
            name: "Data Science & LLM Foundations".to_string(),
            price: 99,
            value_proposition: "Learn data fundamentals, embeddings, RAG, and LLM internals"
                .to_string(),
            includes: "Beginner-friendly structured curriculum".to_string(),
            sections: "\
1. Data Science Fundamentals (Pandas, NumPy)
2. How LLMs Work: Tokens, Transformers
3. Embeddings and Vector Databases
4. Retrieval-Augmented Generation (RAG) from Scratch
5. Introduction to Fine-Tuning
6. Building a Semantic Search Engine"
                .to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_has_six_courses() {
        assert_eq!(default_catalog().items().len(), 6);
    }

    #[test]
    fn default_catalog_prices_match_listing() {
        let catalog = default_catalog();
        let expected = [
            ("ai_marketing_platform", 149),
            ("ai_automation_engineer", 199),
            ("ai_chatbot_mastery", 129),
            ("ai_saas_builder", 249),
            ("prompt_engineering_deep_dive", 79),
            ("ds_llm_foundations", 99),
        ];
        for (id, price) in expected {
            assert_eq!(catalog.find(id).unwrap().price, price, "price of {}", id);
        }
    }

    #[test]
    fn find_returns_none_for_unknown_id() {
        assert!(default_catalog().find("underwater_basket_weaving").is_none());
        assert!(!default_catalog().contains("underwater_basket_weaving"));
    }

    #[test]
    fn rejects_zero_price() {
        let mut items = builtin_items();
        items[0].price = 0;
        assert!(matches!(
            Catalog::new(items),
            Err(CatalogError::NonPositivePrice { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut items = builtin_items();
        let dup = items[0].clone();
        items.push(dup);
        assert!(matches!(
            Catalog::new(items),
            Err(CatalogError::DuplicateId { .. })
        ));
    }

    #[test]
    fn listings_cover_all_courses() {
        let listings = default_catalog().render_listings();
        for item in default_catalog().items() {
            assert!(listings.contains(&item.id));
        }
    }
}
