//! Per-entity field validators. Every validator runs before any write and
//! reports failures as a field -> reason map; that map is the error contract
//! API clients see verbatim. Patch validators only check the fields that are
//! actually present.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{
    ActorInput, CrewInput, EpisodeInput, EpisodePatch, RegistrationInput, ScreenTimeInput,
    SeasonInput, SeasonPatch, ShowInput, ShowPatch,
};

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationErrors(pub BTreeMap<String, String>);

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, reason: impl Into<String>) {
        self.0.insert(field.to_string(), reason.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, reason) in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{field}: {reason}")?;
            first = false;
        }
        Ok(())
    }
}

fn check_required(errors: &mut ValidationErrors, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.add(field, format!("{field} is required"));
    }
}

fn check_min_one(errors: &mut ValidationErrors, field: &str, value: i32) {
    if value < 1 {
        errors.add(field, format!("{field} must be an integer >= 1"));
    }
}

fn check_rating(errors: &mut ValidationErrors, value: i32) {
    if !(0..=10).contains(&value) {
        errors.add("rating", "rating must be between 0 and 10");
    }
}

/// Syntactic email check: one '@' with a non-empty local part and a dotted,
/// non-empty domain. Deliverability is not our problem.
fn check_email(errors: &mut ValidationErrors, value: &str) {
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.contains(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        errors.add("email", "email must be a valid email address");
    }
}

pub fn validate_show(input: &ShowInput) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_required(&mut errors, "title", &input.title);
    errors.into_result()
}

pub fn validate_show_patch(patch: &ShowPatch) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if let Some(title) = &patch.title {
        check_required(&mut errors, "title", title);
    }
    errors.into_result()
}

pub fn validate_season(input: &SeasonInput) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_min_one(&mut errors, "season_number", input.season_number);
    errors.into_result()
}

pub fn validate_season_patch(patch: &SeasonPatch) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if let Some(number) = patch.season_number {
        check_min_one(&mut errors, "season_number", number);
    }
    errors.into_result()
}

pub fn validate_episode(input: &EpisodeInput) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_min_one(&mut errors, "episode_number", input.episode_number);
    check_required(&mut errors, "title", &input.title);
    if let Some(rating) = input.rating {
        check_rating(&mut errors, rating);
    }
    errors.into_result()
}

pub fn validate_episode_patch(patch: &EpisodePatch) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if let Some(number) = patch.episode_number {
        check_min_one(&mut errors, "episode_number", number);
    }
    if let Some(title) = &patch.title {
        check_required(&mut errors, "title", title);
    }
    if let Some(rating) = patch.rating {
        check_rating(&mut errors, rating);
    }
    errors.into_result()
}

pub fn validate_actor(input: &ActorInput) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_required(&mut errors, "first_name", &input.first_name);
    errors.into_result()
}

pub fn validate_crew(input: &CrewInput) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_required(&mut errors, "first_name", &input.first_name);
    errors.into_result()
}

pub fn validate_screen_time(input: &ScreenTimeInput) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if input.actor_id < 1 {
        errors.add("actor_id", "actor_id must be an integer >= 1");
    }
    if input.episode_id < 1 {
        errors.add("episode_id", "episode_id must be an integer >= 1");
    }
    errors.into_result()
}

pub fn validate_registration(input: &RegistrationInput) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_required(&mut errors, "username", &input.username);
    if input.password.is_empty() {
        errors.add("password", "password is required");
    }
    if let Some(email) = &input.email
        && !email.trim().is_empty()
    {
        check_email(&mut errors, email);
    }
    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode_input(number: i32, rating: Option<i32>) -> EpisodeInput {
        EpisodeInput {
            season_id: 1,
            episode_number: number,
            title: "Pilot".to_string(),
            description: None,
            rating,
            date_published: None,
        }
    }

    #[test]
    fn test_rating_bounds() {
        assert!(validate_episode(&episode_input(1, Some(0))).is_ok());
        assert!(validate_episode(&episode_input(1, Some(10))).is_ok());
        assert!(validate_episode(&episode_input(1, Some(-1))).is_err());
        assert!(validate_episode(&episode_input(1, Some(11))).is_err());
        assert!(validate_episode(&episode_input(1, None)).is_ok());
    }

    #[test]
    fn test_episode_number_minimum() {
        assert!(validate_episode(&episode_input(1, None)).is_ok());
        assert!(validate_episode(&episode_input(0, None)).is_err());
        assert!(validate_episode(&episode_input(-3, None)).is_err());
    }

    #[test]
    fn test_required_title_trimmed() {
        let show = ShowInput {
            title: "   ".to_string(),
            description: None,
        };
        let errors = validate_show(&show).unwrap_err();
        assert!(errors.0.contains_key("title"));
    }

    #[test]
    fn test_patch_skips_absent_fields() {
        assert!(validate_episode_patch(&EpisodePatch::default()).is_ok());

        let patch = EpisodePatch {
            rating: Some(11),
            ..Default::default()
        };
        assert!(validate_episode_patch(&patch).is_err());
    }

    #[test]
    fn test_email_syntax() {
        let mut input = RegistrationInput {
            username: "alice".to_string(),
            password: "pw123".to_string(),
            email: Some("alice@example.com".to_string()),
        };
        assert!(validate_registration(&input).is_ok());

        for bad in ["plainaddress", "@example.com", "a@b", "a@.com", "a b@c.io"] {
            input.email = Some(bad.to_string());
            assert!(
                validate_registration(&input).is_err(),
                "accepted bad email {bad}"
            );
        }

        input.email = None;
        assert!(validate_registration(&input).is_ok());
    }

    #[test]
    fn test_error_map_field_names() {
        let input = SeasonInput {
            tvshow_id: 1,
            season_number: 0,
            title: None,
            description: None,
            date_started: None,
            date_ended: None,
        };
        let errors = validate_season(&input).unwrap_err();
        assert_eq!(
            errors.0.get("season_number").unwrap(),
            "season_number must be an integer >= 1"
        );
    }
}
