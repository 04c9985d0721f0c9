//! `st-agent` — vehicle agents and population generation.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                   |
//! |----------------|------------------------------------------------------------|
//! | [`agent`]      | `Agent`, `AgentStatus`                                     |
//! | [`population`] | `PopulationConfig`, `Population`, `generate_agents`, area sampling |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `PopulationConfig` and `AgentStatus`. |

pub mod agent;
pub mod population;


pub use agent::{Agent, AgentStatus};
pub use population::{generate_agents, nodes_in_areas, pick_random_node, Population, PopulationConfig};
