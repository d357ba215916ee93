// SPDX-FileCopyrightText: 2026 Raad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canned example questions offered to new users.

use serde::Serialize;
use strum::{Display, EnumIter, IntoEnumIterator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, Serialize)]
pub enum ExampleCategory {
    Popular,
    Analysis,
    Exploration,
}

/// A labelled question that can be sent as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExampleQuestion {
    pub category: ExampleCategory,
    pub label: &'static str,
    pub query: &'static str,
}

const fn example(
    category: ExampleCategory,
    label: &'static str,
    query: &'static str,
) -> ExampleQuestion {
    ExampleQuestion {
        category,
        label,
        query,
    }
}

pub const EXAMPLE_QUESTIONS: &[ExampleQuestion] = &[
    example(
        ExampleCategory::Popular,
        "Top 10 companies by revenue 2024",
        "What are the top 10 companies by revenue in 2024?",
    ),
    example(
        ExampleCategory::Popular,
        "Average ROE by sector 2023",
        "Show average ROE by sector in 2023",
    ),
    example(
        ExampleCategory::Popular,
        "Companies with high debt",
        "Which companies have debt to equity ratio greater than 2?",
    ),
    example(
        ExampleCategory::Analysis,
        "Net profit margins by sector",
        "Compare net profit margins across sectors",
    ),
    example(
        ExampleCategory::Analysis,
        "Negative profit companies 2024",
        "List companies with negative net profit in 2024",
    ),
    example(
        ExampleCategory::Analysis,
        "Top 5 by total assets chart",
        "Create a bar chart showing top 5 companies by total assets",
    ),
    example(
        ExampleCategory::Exploration,
        "Sector breakdown",
        "How many companies are in each sector?",
    ),
    example(
        ExampleCategory::Exploration,
        "Average current ratio",
        "What is the average current ratio by sector?",
    ),
];

/// Examples grouped by category, in catalog order.
pub fn by_category() -> Vec<(ExampleCategory, Vec<ExampleQuestion>)> {
    ExampleCategory::iter()
        .map(|category| {
            let items = EXAMPLE_QUESTIONS
                .iter()
                .copied()
                .filter(|e| e.category == category)
                .collect();
            (category, items)
        })
        .collect()
}
