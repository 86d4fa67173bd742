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

pub mod logging;

use anyhow::Context;
use model::json_serialisation::load_cargo_routing_instance_from_json;
use serde_json::json;
use solver::column_generation::ColumnGeneration;
use solver::json_serialisation::result_to_json;
use tracing::info;

use std::time as stdtime;

pub fn run(input_data: serde_json::Value) -> anyhow::Result<serde_json::Value> {
    let network = load_cargo_routing_instance_from_json(input_data)
        .context("could not load the instance")?;
    let start_time = stdtime::Instant::now();
    info!(
        "network with {} nodes: {} flight, {} ground and {} no-service arcs",
        network.number_of_nodes(),
        network.flight_arcs().count(),
        network.ground_arcs().count(),
        network.no_service_arcs().count()
    );

    let column_generation = ColumnGeneration::initialize(network.clone())?;
    let result = column_generation.solve()?;

    let end_time = stdtime::Instant::now();
    let runtime_duration = end_time.duration_since(start_time);

    println!("\n\nFinal routing:");
    result.schedule().print_routing();
    println!();
    result.schedule().print_summary();
    println!();
    result.print_iterations();

    println!("Running time: {:0.2}sec", runtime_duration.as_secs_f32());

    result_to_json(&result).context("could not write the result")
}

/// sets the number of pricing threads in the `columnGeneration` block of the instance.
pub fn override_threads(input_data: &mut serde_json::Value, threads: usize) -> anyhow::Result<()> {
    let parameters = input_data
        .get_mut("parameters")
        .and_then(|parameters| parameters.as_object_mut())
        .context("instance has no parameters block")?;
    let column_generation = parameters
        .entry("columnGeneration")
        .or_insert_with(|| json!({}));
    column_generation
        .as_object_mut()
        .context("columnGeneration must be an object")?
        .insert(String::from("threads"), json!(threads));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example_instance() -> serde_json::Value {
        serde_json::from_str(include_str!("../resources/example_instance.json")).unwrap()
    }

    #[test]
    fn example_instance_is_solved() {
        let output = run(example_instance()).unwrap();

        let schedule = &output["schedule"];
        assert_eq!(schedule["routing"].as_array().unwrap().len(), 5);
        let objective = output["objective"].as_f64().unwrap();
        let total = schedule["costs"]["total"].as_f64().unwrap();
        assert!((objective - total).abs() < 1e-6);
        assert!(output["relaxedObjective"].as_f64().unwrap() <= objective + 1e-6);
        assert!(!output["iterations"].as_array().unwrap().is_empty());
    }

    #[test]
    fn threads_are_written_into_the_column_generation_block() {
        let mut input = example_instance();

        override_threads(&mut input, 3).unwrap();

        assert_eq!(input["parameters"]["columnGeneration"]["threads"], 3);
        assert_eq!(
            input["parameters"]["columnGeneration"]["pricingEngine"],
            "networkSimplex"
        );
    }

    #[test]
    fn threads_need_a_parameters_block() {
        let mut input = json!({ "airports": [] });
        assert!(override_threads(&mut input, 2).is_err());
    }
}
