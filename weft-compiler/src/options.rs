//! Options for template compilation.

/// Which program the compiler emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Target {
    /// Template cloning plus DOM binding calls (client).
    #[default]
    Dom,
    /// HTML string building with hydration markers (server).
    Ssr,
}

/// Options for [`crate::compile_template`] and [`crate::compile_module`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    pub target: Target,

    /// Path of the runtime crate in the emitted `use` declaration.
    /// Defaults to `"::weft_runtime"`.
    pub runtime: String,

    /// Name of the template macro the module driver looks for.
    /// Defaults to `"view"`, matching `view! { ... }`.
    pub macro_name: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            target: Target::Dom,
            runtime: "::weft_runtime".to_string(),
            macro_name: "view".to_string(),
        }
    }
}

impl CompileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    #[must_use]
    pub fn with_runtime(mut self, runtime: impl Into<String>) -> Self {
        self.runtime = runtime.into();
        self
    }

    #[must_use]
    pub fn with_macro_name(mut self, name: impl Into<String>) -> Self {
        self.macro_name = name.into();
        self
    }
}
