//! Pulling columns out of a batch of records.
//!
//! Run with: cargo run --example extract

use std::error::Error;
use structmeta::{reflect_struct, to_struct, to_structs, Structs};

reflect_struct! {
    #[derive(Debug, Clone)]
    pub struct Staff => r#"vm:"staff""# {
        pub name: String,
        pub role: String => r#"vm:"position""#,
    }
}

reflect_struct! {
    #[derive(Debug, Clone)]
    pub struct Shift => r#"vm:"shift" json:"shifts""# {
        pub id: u32 => r#"vm:"shiftid""#,
        pub hours: Vec<u8>,
        pub lead: Staff => r#"struct:"true""#,
        pub backup: Option<Staff> => r#"struct:"true""#,
        internal_note: String,
    }
}

fn shift(id: u32, hours: Vec<u8>, lead: &str, backup: Option<&str>) -> Shift {
    let staff = |name: &str| Staff {
        name: name.to_string(),
        role: "nurse".to_string(),
    };
    Shift {
        id,
        hours,
        lead: staff(lead),
        backup: backup.map(staff),
        internal_note: String::new(),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let shifts = vec![
        shift(1, vec![7, 8, 9], "ana", Some("bo")),
        shift(2, vec![13, 14], "cy", None),
    ];

    // Inspect one record
    let first = to_struct(&shifts[0])?;
    println!("{} (identifier: {})", first.name(), first.identifier());
    for field in &first.fields() {
        println!(
            "  {:<14} {:<8} exported={:<5} tag=[{}] value={}",
            field.identifier(),
            field.ty().to_string(),
            field.exported(),
            field.tag(),
            field.value().value()
        );
    }

    // Walk into the fields flagged as nested structs
    for field in &first.fields().with_tag_true("struct") {
        let child = field.to_struct()?;
        let state = if child.is_nil() { "absent" } else { "present" };
        println!("  nested {} -> {} ({})", field.name(), child.identifier(), state);
    }

    // Pull columns across the batch
    let structs: Structs = to_structs(&shifts)?;
    println!("\nidentifiers: {:?}", structs.identifiers());
    println!("tag names:   {:?}", structs.tag_names(["json"]));

    let data = structs.extract_data_by_name(["hours", "backup"]);
    for (key, values) in &data {
        println!("{:<6} {}", key, serde_json::to_string(values)?);
    }

    Ok(())
}
