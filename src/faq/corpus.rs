// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! The FAQ knowledge base
//!
//! The corpus is fixed for the lifetime of the process: either the built-in
//! relief-platform FAQ or a JSON file read once at startup.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

impl FaqEntry {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

const BUILTIN_FAQS: &[(&str, &str)] = &[
    (
        "Who reviews my application?",
        "Our admin team and NGO partners carefully verify every application.",
    ),
    (
        "Is there any helpline I can call?",
        "Yes! You can contact our support team for further assistance. You can find our contact details by following these steps: Click on the three horizontal lines (☰) at the top left corner of the homepage. Select 'Contact Us' from the menu.",
    ),
    (
        "What if I don't have an NID?",
        "You can use a birth certificate or guardian ID with proper explanation.",
    ),
    (
        "How can I make a donation",
        "You can donate through our app using mobile banking, card, or manual bank transfer. Just click \"Donate Now\" on the home screen , login/signup and follow the steps!",
    ),
    (
        "What if my application is rejected?",
        "You'll receive a message explaining why. You can reapply with updated info.",
    ),
    (
        "How long does it take to get help?",
        "If your request is verified, aid is usually sent within 2–3 days.",
    ),
    (
        "How do you ensure the right people get the money?",
        "All relief applicants go through a strict verification process before being approved.",
    ),
    (
        "Is there a minimum amount I can donate?",
        "Yes, the minimum donation is BDT 50. Every little bit counts!",
    ),
    (
        "How can I apply for financial help?",
        "Go to the \"Apply for Relief\" section, and fill out the form with your correct details.",
    ),
    (
        "Can I apply on behalf of someone else?",
        "Yes, with their consent and proper documentation.",
    ),
];

/// The built-in 10-entry corpus, in its canonical order
pub fn builtin_corpus() -> Vec<FaqEntry> {
    BUILTIN_FAQS
        .iter()
        .map(|(question, answer)| FaqEntry::new(*question, *answer))
        .collect()
}

/// Reads a corpus from a JSON array of `{"question", "answer"}` objects
pub fn load_corpus(path: &Path) -> Result<Vec<FaqEntry>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read FAQ file {}", path.display()))?;
    let entries: Vec<FaqEntry> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse FAQ file {}", path.display()))?;
    Ok(entries)
}
