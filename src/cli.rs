//! Command-line parsing and one-shot command output

use anyhow::{Context, Result, anyhow, bail};

use crate::app::Route;
use crate::models::{Gender, NewOwner, NewPet, Owner, Pet, PhotoFile};

/// Parsed command line
#[derive(Debug, Clone, PartialEq)]
pub struct Cli {
    /// `--api-url` override
    pub api_url: Option<String>,
    pub command: Command,
}

/// CLI commands
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Launch the TUI on a route
    Run { route: Route },
    /// Print every owner
    Owners,
    /// Print every pet with its owner
    Pets,
    AddOwner(NewOwner),
    AddPet(NewPet),
    Help,
    Version,
}

/// Options parsed after a command's positional name
struct Flags {
    values: Vec<(String, Option<String>)>,
}

impl Flags {
    /// Split `--flag value` pairs; `switches` take no value
    fn parse(args: &[String], switches: &[&str]) -> Result<Self> {
        let mut values = Vec::new();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            let Some(name) = arg.strip_prefix("--") else {
                bail!("Unexpected argument: {arg}");
            };
            if switches.contains(&name) {
                values.push((name.to_string(), None));
            } else {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("Missing value for --{name}"))?;
                values.push((name.to_string(), Some(value.clone())));
            }
        }
        Ok(Self { values })
    }

    fn take(&mut self, name: &str) -> Option<String> {
        let index = self.values.iter().position(|(n, _)| n == name)?;
        self.values.remove(index).1
    }

    fn switch(&mut self, name: &str) -> bool {
        self.values
            .iter()
            .position(|(n, _)| n == name)
            .map(|index| self.values.remove(index))
            .is_some()
    }

    fn finish(self) -> Result<()> {
        match self.values.first() {
            Some((name, _)) => bail!("Unknown option: --{name}"),
            None => Ok(()),
        }
    }
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: Option<String>) -> Result<Option<T>> {
    value
        .map(|v| {
            v.parse()
                .map_err(|_| anyhow!("--{flag} expects a number, got '{v}'"))
        })
        .transpose()
}

/// Parse arguments (without the program name)
pub fn parse_args<I>(args: I) -> Result<Cli>
where
    I: IntoIterator<Item = String>,
{
    let mut api_url = None;
    let mut rest = Vec::new();
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        if arg == "--api-url" {
            api_url = Some(iter.next().context("Missing value for --api-url")?);
        } else if let Some(url) = arg.strip_prefix("--api-url=") {
            api_url = Some(url.to_string());
        } else {
            rest.push(arg);
        }
    }

    let command = match rest.first().map(String::as_str) {
        None => Command::Run {
            route: Route::default(),
        },
        Some(path) if path.starts_with('/') => Command::Run {
            route: Route::from_path(path).ok_or_else(|| anyhow!("Unknown route: {path}"))?,
        },
        Some("-h" | "--help" | "help") => Command::Help,
        Some("-v" | "--version" | "version") => Command::Version,
        Some("owners") => Command::Owners,
        Some("pets") => Command::Pets,
        Some("add-owner") => Command::AddOwner(parse_add_owner(&rest[1..])?),
        Some("add-pet") => Command::AddPet(parse_add_pet(&rest[1..])?),
        Some(other) => bail!("Unknown command: {other}\nRun 'petshop --help' for usage"),
    };
    Ok(Cli { api_url, command })
}

fn split_name<'a>(args: &'a [String], what: &str) -> Result<(&'a str, &'a [String])> {
    match args.split_first() {
        Some((name, rest)) if !name.starts_with("--") && !name.trim().is_empty() => {
            Ok((name.as_str(), rest))
        }
        _ => bail!("Missing {what} name"),
    }
}

fn parse_add_owner(args: &[String]) -> Result<NewOwner> {
    let (name, rest) = split_name(args, "owner")?;
    let mut flags = Flags::parse(rest, &[])?;
    let owner = NewOwner {
        name: name.trim().to_string(),
        email: flags.take("email"),
        phone: flags.take("phone"),
        address: flags.take("address"),
        city: flags.take("city"),
        state: flags.take("state"),
        zip_code: flags.take("zip"),
        country: flags.take("country"),
        date_of_birth: flags.take("dob"),
    };
    flags.finish()?;
    Ok(owner)
}

fn parse_add_pet(args: &[String]) -> Result<NewPet> {
    let (name, rest) = split_name(args, "pet")?;
    let mut flags = Flags::parse(rest, &["vaccinated"])?;

    let owner_id = parse_number("owner", flags.take("owner"))?
        .context("--owner <id> is required")?;
    let gender = flags
        .take("gender")
        .map(|g| {
            Gender::from_wire(&g)
                .and_then(Gender::as_wire)
                .map(str::to_string)
                .ok_or_else(|| anyhow!("--gender must be male, female or unknown"))
        })
        .transpose()?;
    let photo = flags
        .take("photo")
        .map(|path| {
            PhotoFile::from_path(&path).with_context(|| format!("Cannot use photo {path}"))
        })
        .transpose()?;

    let pet = NewPet {
        name: name.trim().to_string(),
        owner_id,
        species: flags.take("species"),
        age: parse_number("age", flags.take("age"))?,
        breed: flags.take("breed"),
        color: flags.take("color"),
        weight: parse_number("weight", flags.take("weight"))?,
        description: flags.take("description"),
        gender,
        is_vaccinated: flags.switch("vaccinated").then_some(true),
        birthdate: flags.take("birthdate"),
        photo,
    };
    flags.finish()?;
    Ok(pet)
}

/// One line per owner for `petshop owners`
pub fn owner_row(owner: &Owner) -> String {
    let mut row = format!("#{:<5} {}", owner.id, owner.name);
    for value in [&owner.email, &owner.phone, &owner.city].into_iter().flatten() {
        if !value.is_empty() {
            row.push_str("  ");
            row.push_str(value);
        }
    }
    row
}

/// One line per pet for `petshop pets`, joined to its owner
pub fn pet_row(pet: &Pet, owners: &[Owner]) -> String {
    let owner = owners
        .iter()
        .find(|o| o.id == pet.owner_id)
        .map_or_else(|| format!("Owner #{}", pet.owner_id), |o| o.name.clone());
    let species = pet.species_label().unwrap_or("Unknown");
    let photo = if pet.photo().is_some() { "  📷" } else { "" };
    format!("#{:<5} {} ({species})  owner: {owner}{photo}", pet.id, pet.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli> {
        parse_args(args.iter().map(|s| (*s).to_string()))
    }

    #[test]
    fn test_no_args_runs_tui() {
        let cli = parse(&[]).unwrap();
        assert_eq!(cli.api_url, None);
        assert_eq!(
            cli.command,
            Command::Run {
                route: Route::Owners
            }
        );
    }

    #[test]
    fn test_route_and_api_url() {
        let cli = parse(&["--api-url", "http://shop:9000", "/add-pet"]).unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://shop:9000"));
        assert_eq!(
            cli.command,
            Command::Run {
                route: Route::AddPet
            }
        );
        assert!(parse(&["/vets"]).is_err());
    }

    #[test]
    fn test_add_owner_flags() {
        let cli = parse(&[
            "add-owner",
            "Ada",
            "--email",
            "ada@example.com",
            "--zip",
            "12345",
            "--api-url=http://x",
        ])
        .unwrap();
        let Command::AddOwner(owner) = cli.command else {
            panic!("expected add-owner");
        };
        assert_eq!(owner.name, "Ada");
        assert_eq!(owner.email.as_deref(), Some("ada@example.com"));
        assert_eq!(owner.zip_code.as_deref(), Some("12345"));
        assert_eq!(owner.phone, None);
        assert_eq!(cli.api_url.as_deref(), Some("http://x"));
    }

    #[test]
    fn test_add_owner_errors() {
        assert!(parse(&["add-owner"]).is_err());
        assert!(parse(&["add-owner", "--email", "x"]).is_err());
        assert!(parse(&["add-owner", "Ada", "--nickname", "A"]).is_err());
        assert!(parse(&["add-owner", "Ada", "--email"]).is_err());
    }

    #[test]
    fn test_add_pet_flags() {
        let cli = parse(&[
            "add-pet",
            "Rex",
            "--owner",
            "3",
            "--species",
            "dog",
            "--age",
            "4",
            "--weight",
            "12.5",
            "--gender",
            "Male",
            "--vaccinated",
        ])
        .unwrap();
        let Command::AddPet(pet) = cli.command else {
            panic!("expected add-pet");
        };
        assert_eq!(pet.owner_id, 3);
        assert_eq!(pet.species.as_deref(), Some("dog"));
        assert_eq!(pet.age, Some(4));
        assert_eq!(pet.weight, Some(12.5));
        assert_eq!(pet.gender.as_deref(), Some("male"));
        assert_eq!(pet.is_vaccinated, Some(true));
        assert_eq!(pet.photo, None);
    }

    #[test]
    fn test_add_pet_errors() {
        assert!(parse(&["add-pet", "Rex"]).is_err());
        assert!(parse(&["add-pet", "Rex", "--owner", "x"]).is_err());
        assert!(parse(&["add-pet", "Rex", "--owner", "1", "--gender", "robot"]).is_err());
        assert!(parse(&["add-pet", "Rex", "--owner", "1", "--photo", "/no/such/file.png"]).is_err());
    }

    #[test]
    fn test_add_pet_photo() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rex.png");
        std::fs::write(&path, b"png").unwrap();
        let path = path.display().to_string();

        let cli = parse(&["add-pet", "Rex", "--owner", "1", "--photo", &path]).unwrap();
        let Command::AddPet(pet) = cli.command else {
            panic!("expected add-pet");
        };
        assert_eq!(pet.photo.map(|p| p.file_name), Some("rex.png".to_string()));
    }

    #[test]
    fn test_rows() {
        let owner: Owner = serde_json::from_value(serde_json::json!({
            "id": 1, "name": "Ada", "email": "ada@example.com", "phone": ""
        }))
        .unwrap();
        assert_eq!(owner_row(&owner), "#1     Ada  ada@example.com");

        let pet: Pet = serde_json::from_value(serde_json::json!({
            "id": 2, "name": "Rex", "owner_id": 9, "species": null
        }))
        .unwrap();
        assert_eq!(
            pet_row(&pet, std::slice::from_ref(&owner)),
            "#2     Rex (Unknown)  owner: Owner #9"
        );
    }
}
