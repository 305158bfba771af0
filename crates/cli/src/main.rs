use anyhow::Result;
use clap::{Parser, Subcommand};
use symbridge::commands::{
    get_regvar_command, get_type_command, init_project_command, list_annotations_command,
    project_info_command, resolve_command, resolve_function_command, set_regvar_command,
    set_type_command, stack_var_command,
};
use symbridge::{parse_address, parse_offset};

/// Symbol resolution and annotation bridge CLI.
///
/// This CLI is a thin wrapper around `symbridge-core` (exposed in code as `symbridge_core`).
/// All substantive logic lives in the library so it can be tested thoroughly
/// and reused from other frontends.
#[derive(Parser, Debug)]
#[command(
    name = "symbridge",
    version,
    about = "Resolve disassembly symbols and persist decompiler annotations",
    long_about = None
)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new project at the given root.
    ///
    /// This will:
    /// - Create a `.symbridge` metadata directory.
    /// - Write a `.symbridge/project.json` config file.
    /// - Create the annotation store.
    InitProject {
        /// Project root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Optional project name. If omitted, the name is derived from the root directory.
        #[arg(long)]
        name: Option<String>,

        /// Database snapshot (JSON or YAML) exported from the disassembler.
        #[arg(long)]
        database: Option<String>,
    },

    /// Show basic information about an existing project.
    ProjectInfo {
        #[arg(long, default_value = ".")]
        root: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Resolve and classify the symbol named at an address.
    Resolve {
        #[arg(long, default_value = ".")]
        root: String,

        /// Address (0x-prefixed hex or decimal).
        #[arg(long)]
        address: String,

        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Resolve the function containing an address.
    ResolveFunction {
        #[arg(long, default_value = ".")]
        root: String,

        #[arg(long)]
        address: String,

        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Name the stack variable at a byte offset in a function's frame.
    StackVar {
        #[arg(long, default_value = ".")]
        root: String,

        /// Any address inside the function.
        #[arg(long)]
        function: String,

        /// Stack offset; may be negative.
        #[arg(long, allow_hyphen_values = true)]
        offset: String,

        /// Address size in bytes of the decompiled code.
        #[arg(long, default_value_t = 8)]
        addr_size: u32,
    },

    /// Persist the display name of a register variable.
    SetRegvar {
        #[arg(long, default_value = ".")]
        root: String,

        #[arg(long)]
        function: String,

        /// Register variable key (as the decompiler names it).
        #[arg(long)]
        name: String,

        /// Display name to persist.
        #[arg(long)]
        value: String,
    },

    /// Print the persisted display name of a register variable.
    GetRegvar {
        #[arg(long, default_value = ".")]
        root: String,

        #[arg(long)]
        function: String,

        #[arg(long)]
        name: String,
    },

    /// Persist the type of a variable from a C declaration.
    SetType {
        #[arg(long, default_value = ".")]
        root: String,

        #[arg(long)]
        function: String,

        #[arg(long)]
        name: String,

        /// C declaration, e.g. `unsigned int *`.
        #[arg(long)]
        decl: String,

        /// Address space of the variable: register, stack or ram.
        #[arg(long, default_value = "register")]
        space: String,

        /// Offset of the variable inside its address space.
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        location_offset: String,
    },

    /// Print the persisted type of a variable.
    GetType {
        #[arg(long, default_value = ".")]
        root: String,

        #[arg(long)]
        function: String,

        #[arg(long)]
        name: String,

        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// List annotations stored for a function.
    Annotations {
        #[arg(long, default_value = ".")]
        root: String,

        #[arg(long)]
        function: String,

        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match cli.command {
        Command::InitProject { root, name, database } => {
            init_project_command(&root, name, database)?
        }
        Command::ProjectInfo { root, json } => project_info_command(&root, json)?,
        Command::Resolve { root, address, json } => {
            resolve_command(&root, parse_address(&address)?, json)?
        }
        Command::ResolveFunction { root, address, json } => {
            resolve_function_command(&root, parse_address(&address)?, json)?
        }
        Command::StackVar { root, function, offset, addr_size } => {
            stack_var_command(&root, parse_address(&function)?, parse_offset(&offset)?, addr_size)?
        }
        Command::SetRegvar { root, function, name, value } => {
            set_regvar_command(&root, parse_address(&function)?, &name, &value)?
        }
        Command::GetRegvar { root, function, name } => {
            get_regvar_command(&root, parse_address(&function)?, &name)?
        }
        Command::SetType { root, function, name, decl, space, location_offset } => set_type_command(
            &root,
            parse_address(&function)?,
            &name,
            &decl,
            &space,
            parse_offset(&location_offset)?,
        )?,
        Command::GetType { root, function, name, json } => {
            get_type_command(&root, parse_address(&function)?, &name, json)?
        }
        Command::Annotations { root, function, json } => {
            list_annotations_command(&root, parse_address(&function)?, json)?
        }
    }

    Ok(())
}
