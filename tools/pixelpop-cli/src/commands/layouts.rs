//! List the available layouts, filters and borders.

use pixelpop_booth_model::{BorderStyle, FilterKind, LayoutKind};

pub fn run() -> anyhow::Result<()> {
    println!("Layouts:");
    for kind in LayoutKind::ALL {
        let spec = kind.spec();
        println!(
            "  {:<11} {} photo(s), {}x{}",
            kind.as_str(),
            spec.photo_count,
            spec.width,
            spec.height
        );
    }
    println!();

    println!("Filters:");
    for filter in FilterKind::ALL {
        println!("  {filter}");
    }
    println!();

    println!("Borders:");
    for border in BorderStyle::ALL {
        match border.color() {
            Some(color) => println!("  {:<11} {color}", border.as_str()),
            None => println!("  {}", border.as_str()),
        }
    }

    Ok(())
}
