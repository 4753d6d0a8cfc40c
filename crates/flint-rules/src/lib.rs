//! # flint-rules
//!
//! Built-in check rules for flint.
//!
//! Every rule is a token-stream check implementing [`Rule`]. Rules are
//! independent of each other and hold no state between files.
//!
//! ## Available Rules
//!
//! | Code | Name | Tier | Description |
//! |------|------|------|-------------|
//! | FL001 | `blacklisted-identifiers` | error | Forbids thread-unsafe functions such as `strtok` |
//! | FL002 | `initialize-from-itself` | error | Members initialized with themselves |
//! | FL003 | `if-endif-balance` | error | Unbalanced `#if`/`#else`/`#endif` |
//! | FL004 | `memset` | error | Swapped `memset` arguments |
//! | FL005 | `include-associated-header` | error | Own header must be included first |
//! | FL006 | `include-guard` | error | Headers need a matching include guard |
//! | FL007 | `inl-header-inclusions` | error | `-inl.h` files only from their own header |
//! | FL008 | `constructors` | error | Implicit conversion and mis-qualified copy/move constructors |
//! | FL009 | `catch-by-reference` | error | Exceptions caught by value |
//! | FL010 | `throws-heap-exception` | error | `throw new T` |
//! | FL011 | `banned-identifiers` | error | Identifiers with better alternatives |
//! | FL012 | `unique-ptr-usage` | error | `unique_ptr` array-ness mismatches |
//! | FL013 | `mutex-holder-has-name` | error | Unnamed lock guards |
//! | FL014 | `break-in-synchronized` | error | `break`/`continue` inside `SYNCHRONIZED` |
//! | FL015 | `using-directives` | error | Namespace-scope `using namespace` in headers |
//! | FL016 | `using-namespace-directives` | error | Duplicate or conflicting `using namespace` |
//! | FL017 | `blacklisted-sequences` | warning | `volatile` outside inline assembly |
//! | FL018 | `defined-names` | warning | `#define` of keywords and reserved names |
//! | FL019 | `deprecated-includes` | warning | Includes of deprecated headers |
//! | FL020 | `implicit-cast` | warning | Non-explicit conversion operators |
//! | FL021 | `protected-inheritance` | warning | `protected` bases |
//! | FL022 | `throw-specification` | warning | Dynamic exception specifications |
//! | FL023 | `virtual-destructors` | warning | Polymorphic bases without a virtual destructor |
//! | FL024 | `exception-inheritance` | warning | Non-public `std::exception` bases |
//! | FL025 | `smart-ptr-usage` | warning | `shared_ptr<T> p(new T)` |
//! | FL026 | `namespace-scoped-statics` | warning | Namespace-scope `static` in headers |
//! | FL027 | `upcase-null` | advice | `NULL` instead of `nullptr` |
//!
//! ## Usage
//!
//! ```ignore
//! use flint_core::{Analyzer, Config};
//! use flint_rules::{CatchByReference, Constructors};
//!
//! let analyzer = Analyzer::builder()
//!     .path("./src")
//!     .rule(CatchByReference::new())
//!     .rule(Constructors::new())
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod banned_identifiers;
mod blacklisted_identifiers;
mod blacklisted_sequences;
mod break_in_synchronized;
mod catch_by_reference;
mod constructors;
mod defined_names;
mod deprecated_includes;
mod exception_inheritance;
mod if_endif_balance;
mod implicit_cast;
mod include_associated_header;
mod include_guard;
mod initialize_from_itself;
mod inl_header_inclusions;
mod memset;
mod mutex_holder_has_name;
mod namespace_scoped_statics;
mod presets;
mod protected_inheritance;
mod smart_ptr_usage;
mod support;
mod throw_specification;
mod throws_heap_exception;
mod unique_ptr_usage;
mod upcase_null;
mod using_directives;
mod using_namespace_directives;
mod virtual_destructors;

pub use banned_identifiers::BannedIdentifiers;
pub use blacklisted_identifiers::BlacklistedIdentifiers;
pub use blacklisted_sequences::BlacklistedSequences;
pub use break_in_synchronized::BreakInSynchronized;
pub use catch_by_reference::CatchByReference;
pub use constructors::Constructors;
pub use defined_names::DefinedNames;
pub use deprecated_includes::DeprecatedIncludes;
pub use exception_inheritance::ExceptionInheritance;
pub use if_endif_balance::IfEndifBalance;
pub use implicit_cast::ImplicitCast;
pub use include_associated_header::IncludeAssociatedHeader;
pub use include_guard::IncludeGuard;
pub use initialize_from_itself::InitializeFromItself;
pub use inl_header_inclusions::InlHeaderInclusions;
pub use memset::Memset;
pub use mutex_holder_has_name::MutexHolderHasName;
pub use namespace_scoped_statics::NamespaceScopedStatics;
pub use presets::{all_rules, find_rules, Preset, UnknownRule};
pub use protected_inheritance::ProtectedInheritance;
pub use smart_ptr_usage::SmartPtrUsage;
pub use throw_specification::ThrowSpecification;
pub use throws_heap_exception::ThrowsHeapException;
pub use unique_ptr_usage::UniquePtrUsage;
pub use upcase_null::UpcaseNull;
pub use using_directives::UsingDirectives;
pub use using_namespace_directives::UsingNamespaceDirectives;
pub use virtual_destructors::VirtualDestructors;

/// Re-export core types for convenience.
pub use flint_core::{Diagnostic, Rule, Severity};
