//! List command: running containers managed by ccd.

use anyhow::Result;

use crate::config::Config;
use crate::lifecycle::Controller;
use crate::output::Output;
use crate::pipeline::ExecutionPlan;

pub fn run(plan: &ExecutionPlan) -> Result<i32> {
    let config: Config = plan.config(std::path::PathBuf::new());
    let containers = Controller::new(&config, plan.runner()).running_containers()?;

    if containers.is_empty() {
        Output::info("No running ccd containers");
        return Ok(0);
    }

    Output::subheader("RUNNING:");
    for container in containers {
        Output::row(&container.name, format!("{}  ({})", container.status, container.image));
    }
    Ok(0)
}
