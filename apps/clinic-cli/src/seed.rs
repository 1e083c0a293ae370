//! Seed data for the in-memory repositories.
//!
//! A seed is a JSON document with `pet_types`, `owners` (pets nested inside
//! each owner), `vets` and `visits`. Ids in the document are kept as given.

use std::fs;
use std::path::Path;

use clinic_domain::adapters::memory_repo::{
    InMemoryOwnerRepo, InMemoryPetRepo, InMemoryVetRepo, InMemoryVisitRepo,
};
use clinic_domain::service::ClinicService;
use clinic_domain::{
    ClinicError, Owner, OwnerRepository, PetRepository, PetType, Vet, VetRepository, Visit,
    VisitRepository,
};
use serde::Deserialize;
use tracing::info;

/// Service wired to the in-memory adapters.
pub type MemoryClinic =
    ClinicService<InMemoryOwnerRepo, InMemoryPetRepo, InMemoryVetRepo, InMemoryVisitRepo>;

const DEMO_SEED: &str = include_str!("../seed/demo.json");

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed seed document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Clinic(#[from] ClinicError),
}

#[derive(Debug, Default, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub pet_types: Vec<PetType>,
    #[serde(default)]
    pub owners: Vec<Owner>,
    #[serde(default)]
    pub vets: Vec<Vet>,
    #[serde(default)]
    pub visits: Vec<Visit>,
}

impl Seed {
    /// The bundled demo clinic.
    pub fn demo() -> Result<Self, SeedError> {
        Self::parse(DEMO_SEED)
    }

    pub fn load(path: &Path) -> Result<Self, SeedError> {
        let raw = fs::read_to_string(path)?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Self, SeedError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Fill fresh in-memory repositories and hand back a service over them.
    /// Pets nested under owners are also stored in the pet repository; the
    /// owner keeps the saved copies, ids and back-references included.
    pub fn install(self) -> Result<MemoryClinic, SeedError> {
        let owners = InMemoryOwnerRepo::new();
        let pets = InMemoryPetRepo::with_pet_types(self.pet_types);
        let vets = InMemoryVetRepo::new();
        let visits = InMemoryVisitRepo::new();

        let (owner_count, vet_count, visit_count) =
            (self.owners.len(), self.vets.len(), self.visits.len());
        for mut owner in self.owners {
            let nested = owner.take_pets();
            // The owner needs an id before its pets can point back at it.
            owners.save(&mut owner)?;
            for mut pet in nested {
                pet.owner_id = owner.id;
                pets.save(&mut pet)?;
                owner.add_pet(pet);
            }
            owners.save(&mut owner)?;
        }
        for mut vet in self.vets {
            vets.save(&mut vet)?;
        }
        for mut visit in self.visits {
            visits.save(&mut visit)?;
        }

        info!(
            owners = owner_count,
            vets = vet_count,
            visits = visit_count,
            "seed installed"
        );
        Ok(ClinicService::new(owners, pets, vets, visits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinic_domain::EntityId;
    use std::io::Write;

    #[test]
    fn demo_seed_parses_and_installs() {
        let svc = Seed::demo().unwrap().install().unwrap();

        assert_eq!(svc.find_all_owners().unwrap().len(), 10);
        assert_eq!(svc.find_vets().unwrap().len(), 6);
        assert_eq!(svc.find_pet_types().unwrap().len(), 6);

        let coleman = svc.find_owner_by_id(EntityId::new(6)).unwrap().unwrap();
        assert_eq!(coleman.pets().len(), 2);
        let max = svc.find_pet_by_id(EntityId::new(8)).unwrap().unwrap();
        assert_eq!(max.name, "Max");
        assert_eq!(svc.find_visits_by_pet_id(EntityId::new(8)).unwrap().len(), 2);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"owners": [{{"id": 3, "first_name": "Jeff", "last_name": "Black",
                "address": "1450 Oak Blvd.", "city": "Monona", "telephone": "6085555387"}}]}}"#
        )
        .unwrap();

        let seed = Seed::load(file.path()).unwrap();
        assert_eq!(seed.owners.len(), 1);
        assert!(seed.vets.is_empty());

        let svc = seed.install().unwrap();
        let owner = svc.find_owner_by_id(EntityId::new(3)).unwrap().unwrap();
        assert_eq!(owner.last_name, "Black");
    }

    #[test]
    fn nested_pets_without_ids_stay_in_sync() {
        let seed = Seed::parse(
            r#"{"owners": [{"first_name": "Jeff", "last_name": "Black",
                "address": "1450 Oak Blvd.", "city": "Monona", "telephone": "6085555387",
                "pets": [{"name": "Rex"}]}],
              "visits": [{"id": 1, "pet_id": 1, "date": "2013-01-01", "description": "rabies shot"}]}"#,
        )
        .unwrap();
        let svc = seed.install().unwrap();

        let owner = svc.find_owner_by_id(EntityId::new(1)).unwrap().unwrap();
        let rex = owner.pet("Rex").unwrap();
        assert_eq!(rex.id, Some(EntityId::new(1)));
        assert_eq!(rex.owner_id, owner.id);

        let stored = svc.find_pet_by_id(EntityId::new(1)).unwrap().unwrap();
        assert_eq!(&stored, rex);
        assert_eq!(svc.find_visits_by_pet_id(EntityId::new(1)).unwrap().len(), 1);
    }

    #[test]
    fn malformed_seed_reports_parse_error() {
        let err = Seed::parse("{ not json").unwrap_err();
        assert!(matches!(err, SeedError::Parse(_)));
    }

    #[test]
    fn missing_file_reports_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Seed::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, SeedError::Io(_)));
    }
}
