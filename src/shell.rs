use crate::{Donor, DonorUpdate, Registry};
use anyhow::Result;
use std::io::{BufRead, Write};

const MENU: &str = "
1. Add donor
2. Find donor
3. Edit donor
4. Count blood types
5. Exit";

// Read one line of input without its trailing newline.
// Returns None once the input is exhausted.
fn read_line(input: &mut impl BufRead) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

// Prompt for a single field value. Whatever the user types is accepted
// verbatim, blank included. Exhausted input yields "".
fn field(input: &mut impl BufRead, output: &mut impl Write, label: &str) -> Result<String> {
    write!(output, "{label}: ")?;
    output.flush()?;
    Ok(read_line(input)?.unwrap_or_default())
}

fn add(registry: &mut Registry, input: &mut impl BufRead, output: &mut impl Write) -> Result<()> {
    let donor = Donor {
        name: field(input, output, "Name")?,
        email: field(input, output, "Email")?,
        phone: field(input, output, "Phone")?,
        province: field(input, output, "Province")?,
        canton: field(input, output, "Canton")?,
        district: field(input, output, "District")?,
        address: field(input, output, "Address")?,
        blood_group: field(input, output, "Blood group")?,
        rh_factor: field(input, output, "Rh factor (+/-)")?,
    };
    registry.add(donor)?;
    writeln!(output, "Donor added.")?;
    Ok(())
}

fn find(registry: &Registry, input: &mut impl BufRead, output: &mut impl Write) -> Result<()> {
    let name = field(input, output, "Donor name")?;
    match registry.find(&name) {
        Some(donor) => writeln!(output, "{donor}")?,
        None => writeln!(output, "Donor not found.")?,
    }
    Ok(())
}

fn edit(registry: &mut Registry, input: &mut impl BufRead, output: &mut impl Write) -> Result<()> {
    let name = field(input, output, "Donor name")?;
    if registry.find(&name).is_none() {
        writeln!(output, "Donor not found.")?;
        return Ok(());
    }
    let update = DonorUpdate {
        email: field(input, output, "New email")?,
        phone: field(input, output, "New phone")?,
        province: field(input, output, "New province")?,
        canton: field(input, output, "New canton")?,
        district: field(input, output, "New district")?,
        address: field(input, output, "New address")?,
        blood_group: field(input, output, "New blood group")?,
        rh_factor: field(input, output, "New Rh factor (+/-)")?,
    };
    registry.edit(&name, update)?;
    writeln!(output, "Donor updated.")?;
    Ok(())
}

fn count(registry: &Registry, output: &mut impl Write) -> Result<()> {
    writeln!(output, "Donors per blood type:")?;
    for (blood_type, n) in registry.count_by_type() {
        writeln!(output, "{blood_type}: {n}")?;
    }
    Ok(())
}

// Run the interactive menu until exit is chosen or input ends.
// Generic over the streams so tests can script a whole session.
pub fn run(
    registry: &mut Registry,
    mut input: impl BufRead,
    mut output: impl Write,
) -> Result<()> {
    loop {
        writeln!(output, "{MENU}")?;
        write!(output, "Select an option: ")?;
        output.flush()?;
        let Some(line) = read_line(&mut input)? else {
            break;
        };
        // Anything that isn't a known option just re-displays the menu.
        let Ok(option) = line.trim().parse::<u32>() else {
            continue;
        };
        match option {
            1 => add(registry, &mut input, &mut output)?,
            2 => find(registry, &mut input, &mut output)?,
            3 => edit(registry, &mut input, &mut output)?,
            4 => count(registry, &mut output)?,
            5 => break,
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_FILE;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn setup(lines: &[&str]) -> (Registry, tempfile::TempDir) {
        let _ = env_logger::try_init();
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(DEFAULT_FILE);
        if !lines.is_empty() {
            fs::write(&path, lines.join("\n")).unwrap();
        }
        let registry = Registry::open(&path).unwrap();
        (registry, tmp)
    }

    fn script(registry: &mut Registry, lines: &[&str]) -> String {
        let input = lines.join("\n");
        let mut output = Vec::new();
        run(registry, std::io::Cursor::new(input), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_exit() {
        let (mut registry, _tmp) = setup(&[]);
        let out = script(&mut registry, &["5"]);
        assert_eq!(out.matches("Select an option:").count(), 1);
    }

    #[test]
    fn test_end_of_input_terminates() {
        let (mut registry, _tmp) = setup(&[]);
        let out = script(&mut registry, &[]);
        assert_eq!(out.matches("Select an option:").count(), 1);
    }

    #[test]
    fn test_bad_menu_choices_redisplay_menu() {
        let (mut registry, _tmp) = setup(&[]);
        let out = script(&mut registry, &["abc", "", "9", "5"]);
        // One menu per read, with no error text in between.
        assert_eq!(out.matches("Select an option:").count(), 4);
        assert!(!out.contains("error"));
        assert!(!out.contains("Error"));
    }

    #[test]
    fn test_add() {
        let (mut registry, tmp) = setup(&[]);
        let out = script(
            &mut registry,
            &[
                "1", "Ana", "a@x.com", "111", "P", "C", "D", "Addr", "O", "+", "5",
            ],
        );
        assert!(out.contains("Name: "));
        assert!(out.contains("Rh factor (+/-): "));
        assert!(out.contains("Donor added."));
        assert_eq!(
            fs::read_to_string(tmp.path().join(DEFAULT_FILE)).unwrap(),
            "Ana,a@x.com,111,P,C,D,Addr,O,+\n"
        );
    }

    #[test]
    fn test_find_prints_donor_line() {
        let (mut registry, _tmp) = setup(&["Ana,a@x.com,111,P,C,D,Addr,O,+"]);
        let out = script(&mut registry, &["2", "ana", "5"]);
        assert!(out.contains("Ana,a@x.com,111,P,C,D,Addr,O,+"));
    }

    #[test]
    fn test_find_not_found() {
        let (mut registry, _tmp) = setup(&[]);
        let out = script(&mut registry, &["2", "Ana", "5"]);
        assert!(out.contains("Donor not found."));
    }

    #[test]
    fn test_edit() {
        let (mut registry, tmp) = setup(&["Ana,a@x.com,111,P,C,D,Addr,O,+"]);
        let out = script(
            &mut registry,
            &[
                "3", "ana", "b@y.com", "222", "P2", "C2", "D2", "Addr2", "AB", "-", "5",
            ],
        );
        assert!(out.contains("New email: "));
        assert!(out.contains("Donor updated."));
        assert_eq!(
            fs::read_to_string(tmp.path().join(DEFAULT_FILE)).unwrap(),
            "Ana,b@y.com,222,P2,C2,D2,Addr2,AB,-\n"
        );
    }

    #[test]
    fn test_edit_not_found_skips_prompts() {
        let (mut registry, _tmp) = setup(&[]);
        let out = script(&mut registry, &["3", "Ana", "5"]);
        assert!(out.contains("Donor not found."));
        assert!(!out.contains("New email"));
    }

    #[test]
    fn test_count() {
        let (mut registry, _tmp) = setup(&[
            "Ana,a@x.com,111,P,C,D,Addr,O,+",
            "Luis,l@x.com,222,P,C,D,Addr,O,+",
            "Marta,m@x.com,333,P,C,D,Addr,A,-",
        ]);
        let out = script(&mut registry, &["4", "5"]);
        assert!(out.contains("Donors per blood type:"));
        assert!(out.contains("O +: 2"));
        assert!(out.contains("A -: 1"));
    }
}
