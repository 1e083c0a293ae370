use tracing::{debug, info};

use crate::validate::{validate_owner, validate_visit};
use crate::{
    ClinicError, EntityId, Owner, OwnerRepository, Pet, PetRepository, PetType, Vet,
    VetRepository, Visit, VisitRepository,
};

/// Application service in front of the four clinic repositories.
///
/// Holds nothing but its repositories. Every call is forwarded to exactly one
/// of them and repository errors come back unchanged; adoption is the only
/// operation that does work of its own before delegating.
pub struct ClinicService<Owners, Pets, Vets, Visits>
where
    Owners: OwnerRepository,
    Pets: PetRepository,
    Vets: VetRepository,
    Visits: VisitRepository,
{
    owners: Owners,
    pets: Pets,
    vets: Vets,
    visits: Visits,
}

impl<Owners, Pets, Vets, Visits> ClinicService<Owners, Pets, Vets, Visits>
where
    Owners: OwnerRepository,
    Pets: PetRepository,
    Vets: VetRepository,
    Visits: VisitRepository,
{
    pub fn new(owners: Owners, pets: Pets, vets: Vets, visits: Visits) -> Self {
        Self {
            owners,
            pets,
            vets,
            visits,
        }
    }

    /// Look up an owner. Returns whatever the repository returns, absence included.
    pub fn find_owner_by_id(&self, id: EntityId) -> Result<Option<Owner>, ClinicError> {
        debug!(owner_id = %id, "find owner");
        self.owners.find_by_id(id)
    }

    /// Owners whose last name starts with `prefix`.
    pub fn find_owner_by_last_name(&self, prefix: &str) -> Result<Vec<Owner>, ClinicError> {
        self.owners.find_by_last_name(prefix)
    }

    pub fn find_all_owners(&self) -> Result<Vec<Owner>, ClinicError> {
        self.owners.find_all()
    }

    /// Validate and persist an owner.
    pub fn save_owner(&self, owner: &mut Owner) -> Result<(), ClinicError> {
        validate_owner(owner)?;
        self.owners.save(owner)
    }

    pub fn find_pet_by_id(&self, id: EntityId) -> Result<Option<Pet>, ClinicError> {
        self.pets.find_by_id(id)
    }

    pub fn find_pet_types(&self) -> Result<Vec<PetType>, ClinicError> {
        self.pets.find_pet_types()
    }

    /// Persist a pet as given. No validation happens here.
    pub fn save_pet(&self, pet: &mut Pet) -> Result<(), ClinicError> {
        debug!(pet = %pet.name, "save pet");
        self.pets.save(pet)
    }

    pub fn find_vets(&self) -> Result<Vec<Vet>, ClinicError> {
        self.vets.find_all()
    }

    pub fn find_vet_by_id(&self, id: EntityId) -> Result<Option<Vet>, ClinicError> {
        self.vets.find_by_id(id)
    }

    /// Validate and persist a visit.
    pub fn save_visit(&self, visit: &mut Visit) -> Result<(), ClinicError> {
        validate_visit(visit)?;
        self.visits.save(visit)
    }

    pub fn find_visits_by_pet_id(&self, pet_id: EntityId) -> Result<Vec<Visit>, ClinicError> {
        self.visits.find_by_pet_id(pet_id)
    }

    /// Give `pet` to `owner` and persist the owner.
    ///
    /// With no pet this is a no-op: the owner is left untouched and no
    /// repository is contacted. The pet itself is never saved here; callers
    /// persist it separately through [`ClinicService::save_pet`].
    pub fn adopt_a_pet(&self, owner: &mut Owner, pet: Option<Pet>) -> Result<(), ClinicError> {
        let Some(pet) = pet else {
            debug!("adoption skipped: no pet given");
            return Ok(());
        };
        info!(owner = ?owner.id, pet = %pet.name, "adopting pet");
        owner.add_pet(pet);
        self.owners.save(owner)
    }
}
