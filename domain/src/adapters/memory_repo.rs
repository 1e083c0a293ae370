use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::{
    ClinicError, Entity, EntityId, Owner, OwnerRepository, Pet, PetRepository, PetType, Vet,
    VetRepository, Visit, VisitRepository,
};

/// Id-keyed table shared by the in-memory repositories. Ids start at 1 and
/// never go backwards, even when callers save entities with explicit ids.
struct Table<T> {
    inner: Mutex<TableState<T>>,
}

struct TableState<T> {
    rows: BTreeMap<EntityId, T>,
    next_id: u32,
}

impl<T: Entity + Clone> Table<T> {
    fn new() -> Self {
        Self {
            inner: Mutex::new(TableState {
                rows: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, TableState<T>>, ClinicError> {
        self.inner
            .lock()
            .map_err(|_| ClinicError::Repository("mutex poisoned".into()))
    }

    fn get(&self, id: EntityId) -> Result<Option<T>, ClinicError> {
        Ok(self.lock()?.rows.get(&id).cloned())
    }

    fn all(&self) -> Result<Vec<T>, ClinicError> {
        Ok(self.lock()?.rows.values().cloned().collect())
    }

    fn filter<F: Fn(&T) -> bool>(&self, pred: F) -> Result<Vec<T>, ClinicError> {
        Ok(self
            .lock()?
            .rows
            .values()
            .filter(|row| pred(*row))
            .cloned()
            .collect())
    }

    fn save(&self, entity: &mut T) -> Result<(), ClinicError> {
        let mut state = self.lock()?;
        let id = match entity.id() {
            Some(id) => id,
            None => {
                let id = EntityId::new(state.next_id);
                entity.set_id(id);
                id
            }
        };
        state.next_id = state.next_id.max(id.get().saturating_add(1));
        state.rows.insert(id, entity.clone());
        Ok(())
    }
}

/// In-memory owner repository. Owners are stored together with their pets.
pub struct InMemoryOwnerRepo {
    table: Table<Owner>,
}

impl InMemoryOwnerRepo {
    pub fn new() -> Self {
        Self {
            table: Table::new(),
        }
    }
}

impl Default for InMemoryOwnerRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl OwnerRepository for InMemoryOwnerRepo {
    fn find_by_id(&self, id: EntityId) -> Result<Option<Owner>, ClinicError> {
        self.table.get(id)
    }

    fn find_by_last_name(&self, prefix: &str) -> Result<Vec<Owner>, ClinicError> {
        self.table.filter(|o| o.last_name.starts_with(prefix))
    }

    fn find_all(&self) -> Result<Vec<Owner>, ClinicError> {
        self.table.all()
    }

    fn save(&self, owner: &mut Owner) -> Result<(), ClinicError> {
        self.table.save(owner)
    }
}

/// In-memory pet repository, also holding the pet-type catalogue.
pub struct InMemoryPetRepo {
    table: Table<Pet>,
    pet_types: Vec<PetType>,
}

impl InMemoryPetRepo {
    pub fn new() -> Self {
        Self::with_pet_types(Vec::new())
    }

    /// Build a repository with a fixed catalogue. Types without an id are
    /// numbered after the highest id already present, in the order given.
    pub fn with_pet_types(pet_types: Vec<PetType>) -> Self {
        let mut last_id = pet_types
            .iter()
            .filter_map(|t| t.id)
            .map(|id| id.get())
            .max()
            .unwrap_or(0);
        let pet_types = pet_types
            .into_iter()
            .map(|mut t| {
                if t.is_new() {
                    last_id = last_id.saturating_add(1);
                    t.set_id(EntityId::new(last_id));
                }
                t
            })
            .collect();
        Self {
            table: Table::new(),
            pet_types,
        }
    }
}

impl Default for InMemoryPetRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl PetRepository for InMemoryPetRepo {
    fn find_by_id(&self, id: EntityId) -> Result<Option<Pet>, ClinicError> {
        self.table.get(id)
    }

    fn find_all(&self) -> Result<Vec<Pet>, ClinicError> {
        self.table.all()
    }

    fn find_pet_types(&self) -> Result<Vec<PetType>, ClinicError> {
        let mut types = self.pet_types.clone();
        types.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(types)
    }

    fn save(&self, pet: &mut Pet) -> Result<(), ClinicError> {
        self.table.save(pet)
    }
}

/// In-memory vet repository.
pub struct InMemoryVetRepo {
    table: Table<Vet>,
}

impl InMemoryVetRepo {
    pub fn new() -> Self {
        Self {
            table: Table::new(),
        }
    }
}

impl Default for InMemoryVetRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl VetRepository for InMemoryVetRepo {
    fn find_by_id(&self, id: EntityId) -> Result<Option<Vet>, ClinicError> {
        self.table.get(id)
    }

    fn find_all(&self) -> Result<Vec<Vet>, ClinicError> {
        self.table.all()
    }

    fn save(&self, vet: &mut Vet) -> Result<(), ClinicError> {
        self.table.save(vet)
    }
}

/// In-memory visit repository.
pub struct InMemoryVisitRepo {
    table: Table<Visit>,
}

impl InMemoryVisitRepo {
    pub fn new() -> Self {
        Self {
            table: Table::new(),
        }
    }
}

impl Default for InMemoryVisitRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl VisitRepository for InMemoryVisitRepo {
    fn find_by_id(&self, id: EntityId) -> Result<Option<Visit>, ClinicError> {
        self.table.get(id)
    }

    fn find_all(&self) -> Result<Vec<Visit>, ClinicError> {
        self.table.all()
    }

    fn find_by_pet_id(&self, pet_id: EntityId) -> Result<Vec<Visit>, ClinicError> {
        self.table.filter(|v| v.pet_id == Some(pet_id))
    }

    fn save(&self, visit: &mut Visit) -> Result<(), ClinicError> {
        self.table.save(visit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn save_assigns_increasing_ids() {
        let repo = InMemoryOwnerRepo::new();
        let mut a = Owner::new("George", "Franklin");
        let mut b = Owner::new("Betty", "Davis");
        repo.save(&mut a).unwrap();
        repo.save(&mut b).unwrap();

        assert_eq!(a.id, Some(EntityId::new(1)));
        assert_eq!(b.id, Some(EntityId::new(2)));
        let got = repo.find_by_id(EntityId::new(2)).unwrap().unwrap();
        assert_eq!(got.last_name, "Davis");
    }

    #[test]
    fn save_existing_replaces_row() {
        let repo = InMemoryOwnerRepo::new();
        let mut owner = Owner::new("Jean", "Coleman");
        repo.save(&mut owner).unwrap();
        owner.city = "Monona".into();
        repo.save(&mut owner).unwrap();

        assert_eq!(repo.find_all().unwrap().len(), 1);
        let got = repo.find_by_id(owner.id.unwrap()).unwrap().unwrap();
        assert_eq!(got.city, "Monona");
    }

    #[test]
    fn explicit_ids_push_the_counter_forward() {
        let repo = InMemoryPetRepo::new();
        let mut seeded = Pet::new("Leo");
        seeded.id = Some(EntityId::new(10));
        repo.save(&mut seeded).unwrap();

        let mut fresh = Pet::new("Basil");
        repo.save(&mut fresh).unwrap();
        assert_eq!(fresh.id, Some(EntityId::new(11)));
    }

    #[test]
    fn find_by_id_missing_is_none() {
        let repo = InMemoryVetRepo::new();
        assert!(repo.find_by_id(EntityId::new(99)).unwrap().is_none());
    }

    #[test]
    fn last_name_prefix_search() {
        let repo = InMemoryOwnerRepo::new();
        for (first, last) in [("Harold", "Davis"), ("Betty", "Davis"), ("Peter", "McTavish")] {
            repo.save(&mut Owner::new(first, last)).unwrap();
        }

        assert_eq!(repo.find_by_last_name("Dav").unwrap().len(), 2);
        assert_eq!(repo.find_by_last_name("").unwrap().len(), 3);
        assert!(repo.find_by_last_name("dav").unwrap().is_empty());
    }

    #[test]
    fn pet_types_numbered_and_sorted() {
        let repo = InMemoryPetRepo::with_pet_types(vec![PetType::new("dog"), PetType::new("cat")]);
        let types = repo.find_pet_types().unwrap();

        assert_eq!(types[0].name, "cat");
        assert_eq!(types[0].id, Some(EntityId::new(2)));
        assert_eq!(types[1].name, "dog");
    }

    #[test]
    fn pet_types_without_ids_do_not_reuse_explicit_ids() {
        let mut dog = PetType::new("dog");
        dog.id = Some(EntityId::new(1));
        let repo = InMemoryPetRepo::with_pet_types(vec![PetType::new("cat"), dog, PetType::new("bird")]);
        let types = repo.find_pet_types().unwrap();

        let id_of = |name: &str| types.iter().find(|t| t.name == name).unwrap().id;
        assert_eq!(id_of("dog"), Some(EntityId::new(1)));
        assert_eq!(id_of("cat"), Some(EntityId::new(2)));
        assert_eq!(id_of("bird"), Some(EntityId::new(3)));
    }

    #[test]
    fn visits_filtered_by_pet() {
        let repo = InMemoryVisitRepo::new();
        let date = NaiveDate::from_ymd_opt(2013, 1, 2).unwrap();
        repo.save(&mut Visit::new(EntityId::new(7), date, "rabies shot"))
            .unwrap();
        repo.save(&mut Visit::new(EntityId::new(8), date, "rabies shot"))
            .unwrap();
        repo.save(&mut Visit::new(EntityId::new(7), date, "neutered"))
            .unwrap();

        let visits = repo.find_by_pet_id(EntityId::new(7)).unwrap();
        assert_eq!(visits.len(), 2);
        assert!(visits.iter().all(|v| v.pet_id == Some(EntityId::new(7))));
    }
}
