//! Domain library for the clinic service.
//!
//! Holds the entities, the repository ports (traits) and the error type. The
//! `ClinicService` facade lives in [`service`]; storage implementations live
//! under [`adapters`]. Keep IO concerns out of this crate.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identity shared by every persisted entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(u32);

impl EntityId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Anything with an optional identity. `None` means not yet persisted.
pub trait Entity {
    fn id(&self) -> Option<EntityId>;
    fn set_id(&mut self, id: EntityId);

    fn is_new(&self) -> bool {
        self.id().is_none()
    }
}

/// Kind of animal, e.g. "cat" or "dog".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetType {
    pub id: Option<EntityId>,
    pub name: String,
}

impl PetType {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }
}

/// A pet. Created on its own, then tied to an owner through adoption.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub id: Option<EntityId>,
    pub name: String,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub pet_type: Option<PetType>,
    /// Id of the owning owner, set when the pet joins an owner's collection.
    #[serde(default)]
    pub owner_id: Option<EntityId>,
}

impl Pet {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A pet owner and the pets they currently own.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub id: Option<EntityId>,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub telephone: String,
    #[serde(default)]
    pets: Vec<Pet>,
}

impl Owner {
    pub fn new<F: Into<String>, L: Into<String>>(first_name: F, last_name: L) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            ..Self::default()
        }
    }

    /// Owned pets in adoption order.
    pub fn pets(&self) -> &[Pet] {
        &self.pets
    }

    /// Empty the collection, handing the pets back to the caller.
    pub fn take_pets(&mut self) -> Vec<Pet> {
        std::mem::take(&mut self.pets)
    }

    /// Append a pet to the collection and point its back-reference at this owner.
    pub fn add_pet(&mut self, mut pet: Pet) {
        pet.owner_id = self.id;
        self.pets.push(pet);
    }

    /// Case-insensitive lookup by pet name.
    pub fn pet(&self, name: &str) -> Option<&Pet> {
        self.pet_ignoring_new(name, false)
    }

    /// Like [`Owner::pet`], optionally skipping pets that were never saved.
    pub fn pet_ignoring_new(&self, name: &str, ignore_new: bool) -> Option<&Pet> {
        self.pets
            .iter()
            .filter(|p| !(ignore_new && p.is_new()))
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }
}

/// Area of expertise for a vet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specialty {
    pub id: Option<EntityId>,
    pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vet {
    pub id: Option<EntityId>,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    specialties: Vec<Specialty>,
}

impl Vet {
    pub fn new<F: Into<String>, L: Into<String>>(first_name: F, last_name: L) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            ..Self::default()
        }
    }

    /// Specialties sorted by name.
    pub fn specialties(&self) -> Vec<&Specialty> {
        let mut sorted: Vec<_> = self.specialties.iter().collect();
        sorted.sort_by(|a, b| a.name.cmp(&b.name));
        sorted
    }

    pub fn add_specialty(&mut self, specialty: Specialty) {
        self.specialties.push(specialty);
    }
}

/// A visit of a pet to the clinic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visit {
    pub id: Option<EntityId>,
    pub date: NaiveDate,
    pub description: String,
    pub pet_id: Option<EntityId>,
}

impl Visit {
    pub fn new<S: Into<String>>(pet_id: EntityId, date: NaiveDate, description: S) -> Self {
        Self {
            id: None,
            date,
            description: description.into(),
            pet_id: Some(pet_id),
        }
    }
}

macro_rules! impl_entity {
    ($($ty:ty),+) => {
        $(impl Entity for $ty {
            fn id(&self) -> Option<EntityId> {
                self.id
            }

            fn set_id(&mut self, id: EntityId) {
                self.id = Some(id);
            }
        })+
    };
}

impl_entity!(Owner, Pet, PetType, Vet, Visit);

/// Repository port for owners.
pub trait OwnerRepository: Send + Sync {
    fn find_by_id(&self, id: EntityId) -> Result<Option<Owner>, ClinicError>;
    /// Owners whose last name starts with `prefix`. An empty prefix matches all.
    fn find_by_last_name(&self, prefix: &str) -> Result<Vec<Owner>, ClinicError>;
    fn find_all(&self) -> Result<Vec<Owner>, ClinicError>;
    /// Insert or update. New owners get an id assigned.
    fn save(&self, owner: &mut Owner) -> Result<(), ClinicError>;
}

/// Repository port for pets and the pet-type catalogue.
pub trait PetRepository: Send + Sync {
    fn find_by_id(&self, id: EntityId) -> Result<Option<Pet>, ClinicError>;
    fn find_all(&self) -> Result<Vec<Pet>, ClinicError>;
    fn find_pet_types(&self) -> Result<Vec<PetType>, ClinicError>;
    fn save(&self, pet: &mut Pet) -> Result<(), ClinicError>;
}

/// Repository port for vets.
pub trait VetRepository: Send + Sync {
    fn find_by_id(&self, id: EntityId) -> Result<Option<Vet>, ClinicError>;
    fn find_all(&self) -> Result<Vec<Vet>, ClinicError>;
    fn save(&self, vet: &mut Vet) -> Result<(), ClinicError>;
}

/// Repository port for visits.
pub trait VisitRepository: Send + Sync {
    fn find_by_id(&self, id: EntityId) -> Result<Option<Visit>, ClinicError>;
    fn find_all(&self) -> Result<Vec<Visit>, ClinicError>;
    fn find_by_pet_id(&self, pet_id: EntityId) -> Result<Vec<Visit>, ClinicError>;
    fn save(&self, visit: &mut Visit) -> Result<(), ClinicError>;
}

/// Core domain errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ClinicError {
    #[error("invalid {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
    #[error("repository error: {0}")]
    Repository(String),
}

/// Return a short about/version line for binaries to print.
pub fn about() -> String {
    let pkg = env!("CARGO_PKG_NAME");
    let ver = env!("CARGO_PKG_VERSION");
    format!("{} v{} - clinic domain library loaded", pkg, ver)
}

pub mod adapters;
pub mod service;
pub mod validate;
