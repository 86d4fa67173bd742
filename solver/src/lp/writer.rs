// © 2023-2024 ETH Zurich
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// any later version.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use std::io::{self, Write};

use super::{LinearProgram, Var, VarKind};

const TERMS_PER_LINE: usize = 6;

pub(super) fn write_lp(program: &LinearProgram, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "\\ {}", program.name())?;
    writeln!(out, "Minimize")?;
    let objective: Vec<(Var, f64)> = program
        .variables()
        .iter()
        .enumerate()
        .filter(|(_, v)| v.cost() != 0.0)
        .map(|(i, v)| (Var(i), v.cost()))
        .collect();
    write!(out, " obj:")?;
    if objective.is_empty() {
        // the format needs at least one term
        if let Some(first) = program.variables().first() {
            write!(out, " 0 {}", first.name())?;
        }
    }
    write_terms(program, &objective, out)?;
    writeln!(out)?;

    writeln!(out, "Subject To")?;
    for constraint in program.constraints() {
        let lower = constraint.lower();
        let upper = constraint.upper();
        let mut rows = Vec::new();
        if lower == upper {
            rows.push((constraint.name().to_string(), "=", lower));
        } else {
            match (lower.is_finite(), upper.is_finite()) {
                (true, true) => {
                    rows.push((format!("{}_lo", constraint.name()), ">=", lower));
                    rows.push((format!("{}_up", constraint.name()), "<=", upper));
                }
                (true, false) => rows.push((constraint.name().to_string(), ">=", lower)),
                (false, true) => rows.push((constraint.name().to_string(), "<=", upper)),
                (false, false) => {}
            }
        }
        for (name, sense, rhs) in rows {
            write!(out, " {}:", name)?;
            if constraint.coefficients().is_empty() {
                if let Some(first) = program.variables().first() {
                    write!(out, " 0 {}", first.name())?;
                }
            }
            write_terms(program, constraint.coefficients(), out)?;
            writeln!(out, " {} {}", sense, rhs)?;
        }
    }

    writeln!(out, "Bounds")?;
    for variable in program.variables() {
        if variable.kind() == VarKind::Binary {
            continue;
        }
        match (variable.lower().is_finite(), variable.upper().is_finite()) {
            (true, true) => writeln!(
                out,
                " {} <= {} <= {}",
                variable.lower(),
                variable.name(),
                variable.upper()
            )?,
            (true, false) => writeln!(out, " {} >= {}", variable.name(), variable.lower())?,
            (false, true) => writeln!(
                out,
                " -inf <= {} <= {}",
                variable.name(),
                variable.upper()
            )?,
            (false, false) => writeln!(out, " {} free", variable.name())?,
        }
    }

    for (section, kind) in [("Generals", VarKind::Integer), ("Binaries", VarKind::Binary)] {
        let names: Vec<&str> = program
            .variables()
            .iter()
            .filter(|v| v.kind() == kind)
            .map(|v| v.name())
            .collect();
        if names.is_empty() {
            continue;
        }
        writeln!(out, "{}", section)?;
        for chunk in names.chunks(TERMS_PER_LINE) {
            writeln!(out, " {}", chunk.join(" "))?;
        }
    }
    writeln!(out, "End")
}

fn write_terms(
    program: &LinearProgram,
    terms: &[(Var, f64)],
    out: &mut impl Write,
) -> io::Result<()> {
    for (i, &(var, coefficient)) in terms.iter().enumerate() {
        if i > 0 && i % TERMS_PER_LINE == 0 {
            write!(out, "\n  ")?;
        }
        let name = program
            .variable(var)
            .map(|v| v.name())
            .unwrap_or("unknown");
        let sign = if coefficient < 0.0 { '-' } else { '+' };
        write!(out, " {} {} {}", sign, coefficient.abs(), name)?;
    }
    Ok(())
}
