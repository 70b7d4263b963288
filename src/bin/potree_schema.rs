#![warn(clippy::all)]

use anyhow::{Context, Result};
use clap::{App, Arg};
use log::{info, warn};
use potree_attributes::layout::{attributes, PointAttributeType, PointAttributes};

struct Args {
    pub attribute_names: Vec<String>,
    pub skip_unknown: bool,
    pub list_attributes: bool,
    pub list_types: bool,
}

fn get_args() -> Result<Args> {
    let matches = App::new("potree schema")
        .version("0.1")
        .author("Pascal Bormann <pascal.bormann@igd.fraunhofer.de>")
        .about("Prints the record layout for the given potree point attributes")
        .arg(
            Arg::with_name("ATTRIBUTES")
                .multiple(true)
                .value_name("ATTRIBUTES")
                .help("Names of standard point attributes, in record order"),
        )
        .arg(
            Arg::with_name("SKIP_UNKNOWN")
                .short("s")
                .long("skip-unknown")
                .help("Skip unknown attribute names instead of failing"),
        )
        .arg(
            Arg::with_name("LIST")
                .short("l")
                .long("list")
                .help("List all standard point attributes"),
        )
        .arg(
            Arg::with_name("TYPES")
                .short("t")
                .long("types")
                .help("List all point attribute types"),
        )
        .get_matches();

    let attribute_names: Vec<String> = matches
        .values_of("ATTRIBUTES")
        .map(|values| values.map(|value| value.to_owned()).collect())
        .unwrap_or_default();

    Ok(Args {
        attribute_names,
        skip_unknown: matches.is_present("SKIP_UNKNOWN"),
        list_attributes: matches.is_present("LIST"),
        list_types: matches.is_present("TYPES"),
    })
}

fn print_types() {
    println!("Types");
    for datatype in PointAttributeType::ALL.iter() {
        println!(
            "\t{:>2} {:<18} {:<8} {} bytes",
            datatype.ordinal(),
            datatype.key(),
            datatype.name(),
            datatype.size()
        );
    }
}

fn print_catalog() -> Result<()> {
    println!("Standard attributes");
    for name in attributes::names() {
        let attribute = attributes::by_name(name)?;
        println!(
            "\t{:<20} {:<30} {} bytes",
            name,
            attribute.to_string(),
            attribute.byte_size()
        );
    }
    Ok(())
}

/// Appends the standard attributes for all known names, skipping unknown names with a warning. Returns the skipped names
fn add_known_attributes<S: AsRef<str>>(
    point_attributes: &mut PointAttributes,
    names: &[S],
) -> Vec<String> {
    let mut skipped = vec![];
    for name in names {
        match attributes::by_name(name.as_ref()) {
            Ok(attribute) => point_attributes.add(attribute),
            Err(why) => {
                warn!("Skipping attribute: {}", why);
                skipped.push(name.as_ref().to_owned());
            }
        }
    }
    skipped
}

fn build_point_attributes(names: &[String], skip_unknown: bool) -> Result<PointAttributes> {
    if !skip_unknown {
        return PointAttributes::from_names(names).context("Could not create point attributes");
    }

    let mut point_attributes = PointAttributes::new();
    add_known_attributes(&mut point_attributes, names);
    Ok(point_attributes)
}

fn print_point_attributes(point_attributes: &PointAttributes) {
    println!("Attributes");
    for (offset, attribute) in point_attributes.attributes_with_offsets() {
        println!("\t{:>4} {}", offset, attribute);
    }
    println!("Record size: {} bytes", point_attributes.byte_size());
    println!("Attribute count: {}", point_attributes.size());
    println!("Has normals: {}", point_attributes.has_normals());
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    let args = get_args()?;

    if args.list_types {
        print_types();
    }
    if args.list_attributes {
        print_catalog()?;
    }
    if args.attribute_names.is_empty() {
        if !args.list_types && !args.list_attributes {
            info!("No attributes given, nothing to do");
        }
        return Ok(());
    }

    let point_attributes = build_point_attributes(&args.attribute_names, args.skip_unknown)?;
    print_point_attributes(&point_attributes);

    Ok(())
}
