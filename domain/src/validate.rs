//! Lightweight input validation helpers. Keep logic minimal and deterministic.

use crate::{ClinicError, Owner, Visit};

const MAX_TELEPHONE_DIGITS: usize = 10;

fn require_non_blank(field: &'static str, value: &str) -> Result<(), ClinicError> {
    if value.trim().is_empty() {
        return Err(ClinicError::Invalid {
            field,
            message: "must not be empty".into(),
        });
    }
    Ok(())
}

/// Validate a telephone number: ASCII digits only, at most ten of them.
pub fn validate_telephone(s: &str) -> Result<(), ClinicError> {
    require_non_blank("telephone", s)?;
    if !s.chars().all(|c| c.is_ascii_digit()) {
        return Err(ClinicError::Invalid {
            field: "telephone",
            message: "must contain digits only".into(),
        });
    }
    if s.len() > MAX_TELEPHONE_DIGITS {
        return Err(ClinicError::Invalid {
            field: "telephone",
            message: format!("at most {} digits", MAX_TELEPHONE_DIGITS),
        });
    }
    Ok(())
}

/// Validate the fields an owner must carry before it is saved.
pub fn validate_owner(owner: &Owner) -> Result<(), ClinicError> {
    require_non_blank("first_name", &owner.first_name)?;
    require_non_blank("last_name", &owner.last_name)?;
    require_non_blank("address", &owner.address)?;
    require_non_blank("city", &owner.city)?;
    validate_telephone(&owner.telephone)
}

pub fn validate_visit(visit: &Visit) -> Result<(), ClinicError> {
    require_non_blank("description", &visit.description)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EntityId;
    use chrono::NaiveDate;

    fn complete_owner() -> Owner {
        let mut owner = Owner::new("Harold", "Davis");
        owner.address = "563 Friendly St.".into();
        owner.city = "Windsor".into();
        owner.telephone = "6085553198".into();
        owner
    }

    #[test]
    fn telephone_validation_basic() {
        assert!(validate_telephone("6085551023").is_ok());
        assert!(validate_telephone("").is_err());
        assert!(validate_telephone("608-555-1023").is_err());
        assert!(validate_telephone("60855510239").is_err());
    }

    #[test]
    fn owner_validation_reports_first_missing_field() {
        assert!(validate_owner(&complete_owner()).is_ok());

        let mut owner = complete_owner();
        owner.city = "   ".into();
        match validate_owner(&owner) {
            Err(ClinicError::Invalid { field, .. }) => assert_eq!(field, "city"),
            other => panic!("expected Invalid(city), got {:?}", other),
        }
    }

    #[test]
    fn visit_requires_description() {
        let date = NaiveDate::from_ymd_opt(2013, 1, 1).unwrap();
        assert!(validate_visit(&Visit::new(EntityId::new(7), date, "rabies shot")).is_ok());
        assert!(validate_visit(&Visit::new(EntityId::new(7), date, "")).is_err());
    }
}
