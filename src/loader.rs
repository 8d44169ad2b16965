//! Reader for the plain text body format.
//!
//! ```text
//! 4.0e9                 domain width
//! 6.67408e-11           gravitational constant
//! >Io                   start of a body, followed by
//! 2.4217e9, 2.0e9       position
//! 0, 17334              velocity
//! 250, 240, 110         color
//! 8.9319e22             mass
//! 1821600               radius
//! ```
//!
//! Blank lines are ignored anywhere.

use std::{
    fs,
    io,
    path::{Path, PathBuf},
    str::FromStr,
};

use thiserror::Error;

use crate::{
    universe::{Body, Color, Universe},
    vector::Vector,
};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("missing domain width")]
    MissingWidth,
    #[error("missing gravitational constant")]
    MissingGravitationalConstant,
    #[error("line {line}: invalid number {value:?}")]
    InvalidNumber { line: usize, value: String },
    #[error("line {line}: expected {expected} comma separated values, found {found}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: domain width must be positive, got {width}")]
    InvalidWidth { line: usize, width: f64 },
    #[error("line {line}: expected a body header starting with '>'")]
    MissingHeader { line: usize },
    #[error("body {name:?} (line {line}) ends after its {found} field lines, expected 5")]
    IncompleteBody {
        name: String,
        line: usize,
        found: usize,
    },
    #[error("body {name:?} (line {line}) has non-positive mass {mass}")]
    NonPositiveMass { name: String, line: usize, mass: f64 },
}

/// Contents of a body file.
#[derive(Clone, Debug)]
pub struct LoadedSystem {
    pub universe: Universe,
    pub gravitational_constant: f64,
    /// Names from the body headers, in the same order as the bodies.
    pub names: Vec<String>,
}

pub fn load_universe(path: impl AsRef<Path>) -> Result<LoadedSystem, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_universe(&text)
}

pub fn parse_universe(text: &str) -> Result<LoadedSystem, LoadError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let (width_line, width) = lines.next().ok_or(LoadError::MissingWidth)?;
    let width: f64 = parse_number(width_line, width)?;
    if !(width > 0. && width.is_finite()) {
        return Err(LoadError::InvalidWidth {
            line: width_line,
            width,
        });
    }

    let (g_line, g) = lines
        .next()
        .ok_or(LoadError::MissingGravitationalConstant)?;
    let gravitational_constant = parse_number(g_line, g)?;

    let mut bodies = Vec::new();
    let mut names = Vec::new();
    let mut current: Option<BodyLines> = None;

    for (number, line) in lines {
        if let Some(name) = line.strip_prefix('>') {
            if let Some(finished) = current.take() {
                bodies.push(finished.build()?);
                names.push(finished.name);
            }
            current = Some(BodyLines::new(name.trim(), number));
            continue;
        }

        match current.as_mut() {
            Some(body) => body.fields.push((number, line)),
            None => return Err(LoadError::MissingHeader { line: number }),
        }
    }
    if let Some(finished) = current {
        bodies.push(finished.build()?);
        names.push(finished.name);
    }

    Ok(LoadedSystem {
        universe: Universe::new(width, bodies),
        gravitational_constant,
        names,
    })
}

/// The lines belonging to one `>` header.
struct BodyLines<'a> {
    name: String,
    line: usize,
    fields: Vec<(usize, &'a str)>,
}

impl<'a> BodyLines<'a> {
    fn new(name: &str, line: usize) -> Self {
        Self {
            name: name.to_owned(),
            line,
            fields: Vec::with_capacity(5),
        }
    }

    fn build(&self) -> Result<Body, LoadError> {
        let [position, velocity, color, mass, radius] = self.fields[..] else {
            return Err(LoadError::IncompleteBody {
                name: self.name.clone(),
                line: self.line,
                found: self.fields.len(),
            });
        };

        let [px, py] = parse_fields(position)?;
        let [vx, vy] = parse_fields(velocity)?;
        let [red, green, blue] = parse_fields(color)?;
        let [mass_value] = parse_fields::<f64, 1>(mass)?;
        let [radius] = parse_fields(radius)?;

        if !(mass_value > 0.) {
            return Err(LoadError::NonPositiveMass {
                name: self.name.clone(),
                line: mass.0,
                mass: mass_value,
            });
        }

        Ok(
            Body::new(mass_value, Vector::new(px, py), Vector::new(vx, vy))
                .with_radius(radius)
                .with_color(Color::new(red, green, blue)),
        )
    }
}

fn parse_number<T: FromStr>(line: usize, value: &str) -> Result<T, LoadError> {
    value.trim().parse().map_err(|_| LoadError::InvalidNumber {
        line,
        value: value.trim().to_owned(),
    })
}

fn parse_fields<T: FromStr, const N: usize>(
    (line, text): (usize, &str),
) -> Result<[T; N], LoadError> {
    let values: Vec<&str> = text.split(',').collect();
    if values.len() != N {
        return Err(LoadError::FieldCount {
            line,
            expected: N,
            found: values.len(),
        });
    }

    let parsed = values
        .into_iter()
        .map(|value| parse_number(line, value))
        .collect::<Result<Vec<T>, _>>()?;

    Ok(parsed
        .try_into()
        .unwrap_or_else(|_| unreachable!("length checked above")))
}
