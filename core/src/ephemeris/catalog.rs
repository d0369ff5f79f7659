//! Built-in targets addressable by name from the command line.

use crate::ephemeris::body::{BodyKind, Target};

const HORIZONS_BODIES: &[(&str, BodyKind, &str)] = &[
    ("Mercury", BodyKind::Planet, "199"),
    ("Venus", BodyKind::Planet, "299"),
    ("Mars", BodyKind::Planet, "499"),
    ("Jupiter", BodyKind::Planet, "599"),
    ("Saturn", BodyKind::Planet, "699"),
    ("Uranus", BodyKind::Planet, "799"),
    ("Neptune", BodyKind::Planet, "899"),
    ("Pluto", BodyKind::Planet, "999"),
    ("Moon", BodyKind::Moon, "301"),
    ("Voyager 1", BodyKind::Spacecraft, "-31"),
    ("Voyager 2", BodyKind::Spacecraft, "-32"),
];

// J2000 right ascension and declination in degrees, visual magnitude.
const BRIGHT_STARS: &[(&str, f64, f64, f64)] = &[
    ("Sirius", 101.287155, -16.716116, -1.46),
    ("Betelgeuse", 88.792939, 7.407064, 0.42),
    ("Rigel", 78.634467, -8.201638, 0.13),
    ("Antares", 247.351915, -26.432003, 1.06),
    ("Aldebaran", 68.980163, 16.509302, 0.86),
    ("Polaris", 37.954561, 89.264109, 1.98),
];

/// Case-insensitive lookup; spaces, dashes and underscores are ignored,
/// so `voyager-1` and `Voyager 1` both resolve.
pub fn lookup(name: &str) -> Option<Target> {
    let wanted = normalize(name);

    if let Some(&(label, kind, command)) = HORIZONS_BODIES
        .iter()
        .find(|(label, _, _)| normalize(label) == wanted)
    {
        return Some(Target::horizons(label, kind, command));
    }

    BRIGHT_STARS
        .iter()
        .find(|(label, ..)| normalize(label) == wanted)
        .map(|&(label, ra, dec, mag)| Target::fixed_star(label, ra, dec, Some(mag)))
}

pub fn names() -> Vec<&'static str> {
    HORIZONS_BODIES
        .iter()
        .map(|(label, ..)| *label)
        .chain(BRIGHT_STARS.iter().map(|(label, ..)| *label))
        .collect()
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}
