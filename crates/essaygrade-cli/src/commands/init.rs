//! The `essaygrade init` command.

use std::path::Path;

use anyhow::{Context, Result};

use essaygrade_core::vocabulary::EMBEDDED_VOCABULARY;

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("essaygrade.toml"), SAMPLE_CONFIG)?;

    std::fs::create_dir_all("vocab").context("failed to create vocab/")?;
    let custom = EMBEDDED_VOCABULARY.replacen("name = \"enem\"", "name = \"custom\"", 1);
    write_if_missing(Path::new("vocab/custom.toml"), &custom)?;

    println!("\nNext steps:");
    println!("  1. Edit vocab/custom.toml to tune the phrase lists");
    println!("  2. Run: essaygrade validate --vocabulary vocab/custom.toml");
    println!("  3. Run: essaygrade grade --file essay.txt");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# essaygrade configuration

# Vocabulary file; remove to use the bundled ENEM vocabulary.
# ${VAR} references are resolved from the environment.
vocabulary = "vocab/custom.toml"

# "word_boundary" or "substring"
match_mode = "word_boundary"

parallelism = 4
output_dir = "./essaygrade-results"

# "thousand" (0-1000) or "decimal" (0-10)
grade_scale = "thousand"

[engine]
min_words = 20
proposal_min_words = 20
elaboration_min_words = 80

# Display criteria, mapped onto competencies 1 to 5 in order.
[[criteria]]
name = "Competência 1"
description = "Domínio da norma culta"
weight = 20

[[criteria]]
name = "Competência 2"
description = "Compreensão do tema e repertório"
weight = 20

[[criteria]]
name = "Competência 3"
description = "Argumentação"
weight = 20

[[criteria]]
name = "Competência 4"
description = "Coesão textual"
weight = 20

[[criteria]]
name = "Competência 5"
description = "Proposta de intervenção"
weight = 20
"#;
