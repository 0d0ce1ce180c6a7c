//! System prompt assembly
//!
//! Every outbound completion embeds a snapshot of the artifact store in
//! the system prompt, wrapped in an `<ARTIFACTS>` block. The block is
//! present even when the store is empty so the model always sees the
//! current state.

use crate::artifacts::store::Artifact;

/// Render artifacts as an `<ARTIFACTS>` block
///
/// ```text
/// <ARTIFACTS>
/// <FILE name='plan.md'>
/// # Plan
/// </FILE>
/// </ARTIFACTS>
/// ```
pub fn render_artifact_block(artifacts: &[Artifact]) -> String {
    let mut block = String::from("<ARTIFACTS>\n");

    for artifact in artifacts {
        block.push_str(&format!(
            "<FILE name='{}'>\n{}\n</FILE>\n",
            artifact.name, artifact.content
        ));
    }

    block.push_str("</ARTIFACTS>");
    block
}

/// Compose the full system prompt from a base prompt and the artifact snapshot
pub fn compose_system_prompt(base: &str, artifacts: &[Artifact]) -> String {
    format!("{}\n{}", base, render_artifact_block(artifacts))
}
