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

use serde_json::json;
use solution::json_serialisation::schedule_to_json;

use crate::column_generation::ColumnGenerationResult;

/// the schedule together with the objective and the course of the column generation.
pub fn result_to_json(
    result: &ColumnGenerationResult,
) -> Result<serde_json::Value, serde_json::Error> {
    let iterations: Vec<serde_json::Value> = result
        .iterations()
        .iter()
        .map(|record| {
            json!({
                "iteration": record.iteration,
                "relaxedObjective": record.relaxed_objective,
                "newColumns": record.new_columns,
                "pathCount": record.catalog_size,
                "elapsedInSeconds": record.elapsed.as_secs_f64(),
            })
        })
        .collect();
    let schedule = schedule_to_json(result.schedule())?;
    Ok(json!({
        "objective": result.objective(),
        "relaxedObjective": result.relaxed_objective(),
        "termination": result.termination().to_string(),
        "iterations": iterations,
        "pathCount": result.catalog_size(),
        "runtimeInSeconds": result.runtime().as_secs_f64(),
        "schedule": schedule,
    }))
}
