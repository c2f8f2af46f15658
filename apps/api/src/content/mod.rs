//! Content parsing: frontmatter/markdown, the resume YAML model, and the
//! quick-action loader. The frontmatter routine here is the one shared
//! parsing contract; the index builder and the loader both go through it.

pub mod frontmatter;
pub mod handlers;
pub mod loader;
pub mod resume;
