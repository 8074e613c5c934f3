//! GCC-family wrapper
//!
//! Rewrites gcc/g++ invocations of the form `gcc -c -o foo.o foo.c`
//! into a local preprocessor run and a remote-side compilation over the
//! preprocessed file.

use regex::Regex;

use crate::error::{RemoteccError, Result};
use crate::wrapper::CompilerWrapper;

const SOURCE_SUFFIXES: &[&str] = &["c", "cxx", "cpp", "cc", "ii", "i"];

const COMPILER_PATTERNS: &[&str] = &[
    r"\bgcc(-[3-9](\.[0-9]+)*)*$",
    r"\bg\+\+(-[3-9](\.[0-9]+)*)*$",
];

/// Wrapper for gcc/g++ (optionally with a `-N[.M]` version suffix).
#[derive(Debug, Default)]
pub struct GccWrapper {
    args: Vec<String>,
    compiler: String,
    srcfile: String,
    objfile: String,
    preprocessed_file: String,
}

impl CompilerWrapper for GccWrapper {
    fn match_compiler(&self, args: &[String]) -> bool {
        let compiler = match args.first() {
            Some(c) => c,
            None => return false,
        };
        COMPILER_PATTERNS
            .iter()
            .any(|rx| Regex::new(rx).map(|re| re.is_match(compiler)).unwrap_or(false))
    }

    fn can_handle_command(&mut self, args: &[String]) -> Result<()> {
        let mut source_count = 0;
        let mut is_object_compilation = false;
        let mut has_object_file = false;
        let mut skip_next_arg = false;
        self.compiler = args.first().cloned().unwrap_or_default();

        for (n, arg) in args.iter().enumerate() {
            if skip_next_arg {
                skip_next_arg = false;
                continue;
            }
            if arg == "-c" {
                is_object_compilation = true;
            } else if arg == "-x" {
                skip_next_arg = true;
            } else if is_source_file(arg) {
                source_count += 1;
                self.srcfile = arg.clone();
            } else if arg == "-o" {
                skip_next_arg = true;
                if let Some(obj) = args.get(n + 1) {
                    self.objfile = obj.clone();
                    has_object_file = true;
                }
            }
        }

        let unsupported = if source_count == 0 {
            Some("no source files")
        } else if source_count > 1 {
            Some("multiple sources")
        } else if !is_object_compilation {
            Some("linking")
        } else if !has_object_file {
            Some("output object is not specified")
        } else {
            None
        };
        if let Some(reason) = unsupported {
            return Err(RemoteccError::UnsupportedCommand(reason.to_string()));
        }
        self.args = args.to_vec();
        Ok(())
    }

    fn preprocessor_cmd(&mut self) -> Result<Vec<String>> {
        if self.args.is_empty() {
            return Err(RemoteccError::UnsupportedCommand(
                "can_handle_command must succeed first".to_string(),
            ));
        }
        let mut cmd = vec![self.compiler.clone()];
        let mut next_arg_is_object = false;
        for arg in &self.args[1..] {
            if arg == "-c" {
                cmd.push("-E".to_string());
            } else if next_arg_is_object {
                self.objfile = arg.clone();
                self.preprocessed_file = self.preprocessed_filename(arg);
                cmd.push(self.preprocessed_file.clone());
                next_arg_is_object = false;
            } else {
                if arg == "-o" {
                    next_arg_is_object = true;
                }
                cmd.push(arg.clone());
            }
        }
        Ok(cmd)
    }

    fn compiler_cmd(&self, source_path: &str, object_path: &str) -> Result<Vec<String>> {
        if self.args.is_empty() || self.srcfile.is_empty() || self.objfile.is_empty() {
            return Err(RemoteccError::UnsupportedCommand(
                "can_handle_command must succeed first".to_string(),
            ));
        }
        let mut cmd = vec![self.compiler.clone()];
        for arg in &self.args[1..] {
            // Preprocessor-only flags are meaningless on the remote side
            if is_preprocessor_arg(arg) {
                continue;
            }
            if *arg == self.srcfile {
                cmd.push("-x".to_string());
                cmd.push(self.lang().to_string());
                cmd.push(source_path.to_string());
            } else if *arg == self.objfile {
                cmd.push(object_path.to_string());
            } else {
                cmd.push(arg.clone());
            }
        }
        Ok(cmd)
    }
}

impl GccWrapper {
    /// The preprocessed-file path this wrapper's preprocessor command
    /// writes to, if known
    pub fn preprocessed_file(&self) -> &str {
        &self.preprocessed_file
    }

    fn lang(&self) -> &'static str {
        match file_extension(&self.srcfile).to_ascii_lowercase().as_str() {
            "c" | "i" => "c",
            _ => "c++",
        }
    }

    fn preprocessed_filename(&self, objfile: &str) -> String {
        let suffix = if self.lang() == "c" { "i" } else { "ii" };
        format!("{}.{suffix}", file_name_without_extension(objfile))
    }
}

fn is_preprocessor_arg(arg: &str) -> bool {
    arg.starts_with("-I") || arg.starts_with("-D")
}

fn is_source_file(path: &str) -> bool {
    let ext = file_extension(path);
    !ext.is_empty() && SOURCE_SUFFIXES.contains(&ext)
}

/// Extension of the final path element, without the dot ("" if none)
fn file_extension(path: &str) -> &str {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rfind('.') {
        Some(idx) if idx > 0 => &name[idx + 1..],
        _ => "",
    }
}

fn file_name_without_extension(path: &str) -> &str {
    let ext = file_extension(path);
    if ext.is_empty() {
        path
    } else {
        &path[..path.len() - ext.len() - 1]
    }
}
