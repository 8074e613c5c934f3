//! Compiler Wrapper Module
//!
//! Translates a local compiler invocation into the two commands a
//! remote compile needs: a local preprocessor run and a
//! remote-transferable compilation. Wrappers are polymorphic over
//! compiler families; candidates are tried in registry order and the
//! first whose `match_compiler` accepts the command wins.

mod gcc;

pub use gcc::GccWrapper;

use crate::error::{RemoteccError, Result};

/// Capability set a compiler family must expose to be offloaded.
pub trait CompilerWrapper: std::fmt::Debug {
    /// Does the command's argv[0] name a compiler of this family?
    fn match_compiler(&self, args: &[String]) -> bool;

    /// Validate that the invocation is a single-source object
    /// compilation this wrapper can rewrite. Must be called before
    /// either command builder.
    fn can_handle_command(&mut self, args: &[String]) -> Result<()>;

    /// Command to run locally to produce the preprocessed source
    fn preprocessor_cmd(&mut self) -> Result<Vec<String>>;

    /// Command for the remote side, compiling `source_path` into
    /// `object_path`
    fn compiler_cmd(&self, source_path: &str, object_path: &str) -> Result<Vec<String>>;
}

/// Find a wrapper for the given command, trying each known compiler
/// family in order.
pub fn find_wrapper(args: &[String]) -> Result<Box<dyn CompilerWrapper>> {
    let candidates: Vec<Box<dyn CompilerWrapper>> = vec![Box::new(GccWrapper::default())];
    for wrapper in candidates {
        if wrapper.match_compiler(args) {
            return Ok(wrapper);
        }
    }
    Err(RemoteccError::UnsupportedCompiler(args.join(" ")))
}
