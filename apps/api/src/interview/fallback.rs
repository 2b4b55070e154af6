//! Static question bank used when the gateway cannot produce a question.

use crate::interview::models::Category;

const TECHNICAL: [&str; 5] = [
    "Explain how you would optimize database queries for high-traffic applications.",
    "Describe your approach to handling security vulnerabilities in web applications.",
    "How do you ensure code scalability and maintainability in large projects?",
    "Explain the differences between microservices and monolithic architecture.",
    "Describe your experience with CI/CD pipelines and automation tools.",
];

const BEHAVIORAL: [&str; 5] = [
    "Describe a time when you had to persuade a team to adopt a technical approach they were initially opposed to.",
    "Tell me about a project where you faced significant scope creep and how you handled it.",
    "Describe a situation where you had to learn a new technology quickly to meet a deadline.",
    "How do you handle conflicts within your team when there are disagreements about technical decisions?",
    "Tell me about a time you failed at a project and what you learned from it.",
];

const PERSONAL: [&str; 5] = [
    "What motivates you to excel in your technical work?",
    "How do you stay updated with the latest technologies and trends in our industry?",
    "Describe your ideal work environment and how it helps you perform at your best.",
    "What professional achievement are you most proud of and why?",
    "Where do you see yourself in your career in the next 3-5 years?",
];

/// Asked for categories outside the built-in set.
pub const GENERIC_QUESTION: &str = "Tell me about your relevant experience.";

pub fn bank_for(category: &Category) -> &'static [&'static str] {
    match category {
        Category::Technical => &TECHNICAL,
        Category::Behavioral => &BEHAVIORAL,
        Category::Personal => &PERSONAL,
        Category::Custom(_) => &[GENERIC_QUESTION],
    }
}

/// First bank entry not yet asked; a templated question once the bank is exhausted.
pub fn fallback_question(category: &Category, used_questions: &[String]) -> String {
    bank_for(category)
        .iter()
        .find(|q| !used_questions.iter().any(|u| u == *q))
        .map(|q| q.to_string())
        .unwrap_or_else(|| {
            format!(
                "Based on your experience in {} aspects, what unique challenge have you faced?",
                category.name().to_lowercase()
            )
        })
}
