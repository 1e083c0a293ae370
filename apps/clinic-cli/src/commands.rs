//! Command parsing and execution against a seeded clinic.

use std::io::Write;

use clinic_domain::{EntityId, Owner, Pet};
use tracing::info;

use crate::error::CliError;
use crate::seed::MemoryClinic;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Owner(EntityId),
    Owners(String),
    Vets,
    Visits(EntityId),
    Adopt {
        owner_id: EntityId,
        pet_name: String,
        pet_type: Option<String>,
    },
}

fn parse_id(what: &str, raw: Option<&String>) -> Result<EntityId, CliError> {
    let Some(raw) = raw else {
        return Err(CliError::Usage(format!("missing <{}>", what)));
    };
    raw.parse::<u32>()
        .map(EntityId::new)
        .map_err(|_| CliError::Usage(format!("invalid <{}>: {}", what, raw)))
}

/// Reject anything beyond the first `expected` arguments.
fn no_extra_args(rest: &[String], expected: usize) -> Result<(), CliError> {
    match rest.get(expected) {
        Some(unk) => Err(CliError::Usage(format!("unknown argument: {}", unk))),
        None => Ok(()),
    }
}

impl Command {
    /// Parse the arguments after the program name. `Ok(None)` means print usage.
    pub fn parse(args: &[String]) -> Result<Option<Self>, CliError> {
        let Some((cmd, rest)) = args.split_first() else {
            return Ok(None);
        };

        let command = match cmd.as_str() {
            "owner" => {
                no_extra_args(rest, 1)?;
                Command::Owner(parse_id("owner-id", rest.first())?)
            }
            "owners" => {
                no_extra_args(rest, 1)?;
                Command::Owners(rest.first().cloned().unwrap_or_default())
            }
            "vets" => {
                no_extra_args(rest, 0)?;
                Command::Vets
            }
            "visits" => {
                no_extra_args(rest, 1)?;
                Command::Visits(parse_id("pet-id", rest.first())?)
            }
            "adopt" => {
                let owner_id = parse_id("owner-id", rest.first())?;
                let Some(pet_name) = rest.get(1).cloned() else {
                    return Err(CliError::Usage("missing <pet-name> for adopt".into()));
                };
                let mut pet_type = None;
                let mut i = 2;
                while i < rest.len() {
                    match rest[i].as_str() {
                        "--type" => {
                            let Some(val) = rest.get(i + 1) else {
                                return Err(CliError::Usage("--type requires a value".into()));
                            };
                            pet_type = Some(val.clone());
                            i += 2;
                        }
                        unk => return Err(CliError::Usage(format!("unknown argument: {}", unk))),
                    }
                }
                Command::Adopt {
                    owner_id,
                    pet_name,
                    pet_type,
                }
            }
            _ => return Ok(None),
        };
        Ok(Some(command))
    }
}

fn fmt_id(id: Option<EntityId>) -> String {
    id.map(|id| id.to_string()).unwrap_or_else(|| "-".into())
}

fn write_owner<W: Write>(svc: &MemoryClinic, owner: &Owner, out: &mut W) -> Result<(), CliError> {
    writeln!(
        out,
        "#{} {} {}, {}, {} ({})",
        fmt_id(owner.id),
        owner.first_name,
        owner.last_name,
        owner.address,
        owner.city,
        owner.telephone
    )?;
    for pet in owner.pets() {
        write_pet(pet, out)?;
        if let Some(pet_id) = pet.id {
            for visit in svc.find_visits_by_pet_id(pet_id)? {
                writeln!(out, "      {} {}", visit.date, visit.description)?;
            }
        }
    }
    Ok(())
}

fn write_pet<W: Write>(pet: &Pet, out: &mut W) -> Result<(), CliError> {
    let kind = pet.pet_type.as_ref().map(|t| t.name.as_str()).unwrap_or("unknown");
    match pet.birth_date {
        Some(born) => writeln!(out, "    pet #{} {} ({}, born {})", fmt_id(pet.id), pet.name, kind, born)?,
        None => writeln!(out, "    pet #{} {} ({})", fmt_id(pet.id), pet.name, kind)?,
    }
    Ok(())
}

/// Run one command, writing human-readable output to `out`.
pub fn execute<W: Write>(svc: &MemoryClinic, command: Command, out: &mut W) -> Result<(), CliError> {
    match command {
        Command::Owner(id) => {
            let owner = svc
                .find_owner_by_id(id)?
                .ok_or_else(|| CliError::NotFound(format!("owner {}", id)))?;
            write_owner(svc, &owner, out)
        }
        Command::Owners(prefix) => {
            let owners = svc.find_owner_by_last_name(&prefix)?;
            if owners.is_empty() {
                writeln!(out, "no owners found")?;
            }
            for owner in &owners {
                write_owner(svc, owner, out)?;
            }
            Ok(())
        }
        Command::Vets => {
            for vet in svc.find_vets()? {
                let specialties: Vec<_> = vet.specialties().into_iter().map(|s| s.name.as_str()).collect();
                let specialties = if specialties.is_empty() {
                    "none".to_string()
                } else {
                    specialties.join(", ")
                };
                writeln!(
                    out,
                    "#{} {} {}: {}",
                    fmt_id(vet.id),
                    vet.first_name,
                    vet.last_name,
                    specialties
                )?;
            }
            Ok(())
        }
        Command::Visits(pet_id) => {
            let pet = svc
                .find_pet_by_id(pet_id)?
                .ok_or_else(|| CliError::NotFound(format!("pet {}", pet_id)))?;
            write_pet(&pet, out)?;
            for visit in svc.find_visits_by_pet_id(pet_id)? {
                writeln!(out, "      {} {}", visit.date, visit.description)?;
            }
            Ok(())
        }
        Command::Adopt {
            owner_id,
            pet_name,
            pet_type,
        } => {
            let mut owner = svc
                .find_owner_by_id(owner_id)?
                .ok_or_else(|| CliError::NotFound(format!("owner {}", owner_id)))?;

            let mut pet = Pet::new(pet_name);
            if let Some(type_name) = pet_type {
                let found = svc
                    .find_pet_types()?
                    .into_iter()
                    .find(|t| t.name.eq_ignore_ascii_case(&type_name))
                    .ok_or_else(|| CliError::Usage(format!("unknown pet type: {}", type_name)))?;
                pet.pet_type = Some(found);
            }
            pet.owner_id = owner.id;

            svc.save_pet(&mut pet)?;
            info!(owner_id = %owner_id, pet = %pet.name, "pet saved, adopting");
            svc.adopt_a_pet(&mut owner, Some(pet))?;
            write_owner(svc, &owner, out)
        }
    }
}
