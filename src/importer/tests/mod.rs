use super::test_helpers::{FakeStepSource, create_test_importer, import_request};
use super::*;
use crate::types::{ImportStep, Source, SourceKey, StepsOutcome};
use std::sync::Arc;


fn import_steps(contents: &[&str]) -> Vec<ImportStep> {
    contents
        .iter()
        .map(|content| ImportStep {
            content: content.to_string(),
            ..Default::default()
        })
        .collect()
}

fn step_contents(detail: &RecipeDetail) -> Vec<&str> {
    detail.steps.iter().map(|s| s.content.as_str()).collect()
}

fn edamam_key(id: &str) -> SourceKey {
    SourceKey::new(Source::Edamam, id)
}
