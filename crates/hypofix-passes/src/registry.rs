//! Target registry and bundled signature table.
//!
//! The registry lists the Hypothesis entry points whose parameters became
//! keyword-only. The signature table records each entry point's current
//! parameter list, in declaration order, as published by Hypothesis 6.
//! Regenerate the table (see `hypofix signatures`) when upstream signatures
//! change; lookups never import the library.

use crate::signature::ParamKind;

/// Entry points whose calls may have positional arguments re-keyworded.
pub const TARGET_REGISTRY: &[&str] = &[
    "hypothesis.target",
    "hypothesis.find",
    "hypothesis.extra.lark.from_lark",
    "hypothesis.extra.numpy.arrays",
    "hypothesis.extra.numpy.array_shapes",
    "hypothesis.extra.numpy.unsigned_integer_dtypes",
    "hypothesis.extra.numpy.integer_dtypes",
    "hypothesis.extra.numpy.floating_dtypes",
    "hypothesis.extra.numpy.complex_number_dtypes",
    "hypothesis.extra.numpy.datetime64_dtypes",
    "hypothesis.extra.numpy.timedelta64_dtypes",
    "hypothesis.extra.numpy.byte_string_dtypes",
    "hypothesis.extra.numpy.unicode_string_dtypes",
    "hypothesis.extra.numpy.array_dtypes",
    "hypothesis.extra.numpy.nested_dtypes",
    "hypothesis.extra.numpy.valid_tuple_axes",
    "hypothesis.extra.numpy.broadcastable_shapes",
    "hypothesis.extra.pandas.indexes",
    "hypothesis.extra.pandas.series",
    "hypothesis.extra.pandas.columns",
    "hypothesis.extra.pandas.data_frames",
    "hypothesis.provisional.domains",
    "hypothesis.stateful.run_state_machine_as_test",
    "hypothesis.stateful.rule",
    "hypothesis.stateful.initialize",
    "hypothesis.strategies.floats",
    "hypothesis.strategies.lists",
    "hypothesis.strategies.sets",
    "hypothesis.strategies.frozensets",
    "hypothesis.strategies.iterables",
    "hypothesis.strategies.dictionaries",
    "hypothesis.strategies.characters",
    "hypothesis.strategies.text",
    "hypothesis.strategies.from_regex",
    "hypothesis.strategies.binary",
    "hypothesis.strategies.fractions",
    "hypothesis.strategies.decimals",
    "hypothesis.strategies.recursive",
    "hypothesis.strategies.complex_numbers",
    "hypothesis.strategies.shared",
    "hypothesis.strategies.uuids",
    "hypothesis.strategies.runner",
    "hypothesis.strategies.functions",
    "hypothesis.strategies.datetimes",
    "hypothesis.strategies.times",
];

/// Keyword-only parameters declared out of their historical positional
/// order. They are skipped when aligning positional arguments.
pub const POSITIONAL_EXCLUSIONS: &[(&str, &str)] =
    &[("hypothesis.strategies.floats", "allow_subnormal")];

/// A deprecated keyword value with a fixed replacement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SentinelRewrite {
    pub target: &'static str,
    pub keyword: &'static str,
    pub sentinel: &'static str,
    pub replacement: &'static str,
}

/// `complex_numbers(min_magnitude=None)` is spelled `min_magnitude=0` now.
pub const DEPRECATED_SENTINEL: SentinelRewrite = SentinelRewrite {
    target: "hypothesis.strategies.complex_numbers",
    keyword: "min_magnitude",
    sentinel: "None",
    replacement: "0",
};

pub fn is_target(qualname: &str) -> bool {
    TARGET_REGISTRY.contains(&qualname)
}

/// Parameters of `qualname` excluded from positional alignment.
pub fn positional_exclusions(qualname: &str) -> impl Iterator<Item = &'static str> + '_ {
    POSITIONAL_EXCLUSIONS
        .iter()
        .filter(move |(target, _)| *target == qualname)
        .map(|(_, parameter)| *parameter)
}

/// Every qualified name that must resolve in the signature table.
pub fn required_signatures() -> impl Iterator<Item = &'static str> {
    TARGET_REGISTRY
        .iter()
        .copied()
        .chain(std::iter::once(DEPRECATED_SENTINEL.target))
}

/// Signatures of the public functions of one module.
#[derive(Debug)]
pub struct ModuleSignatures {
    pub module: &'static str,
    pub functions: &'static [FunctionSignature],
}

#[derive(Debug)]
pub struct FunctionSignature {
    pub name: &'static str,
    pub params: &'static [(&'static str, ParamKind)],
}

impl ModuleSignatures {
    pub fn function(&self, name: &str) -> Option<&FunctionSignature> {
        self.functions.iter().find(|f| f.name == name)
    }
}

pub fn module_signatures(module: &str) -> Option<&'static ModuleSignatures> {
    SIGNATURE_TABLE.iter().find(|m| m.module == module)
}

/// Qualified names of every function in the table, in table order.
pub fn table_qualnames() -> impl Iterator<Item = String> {
    SIGNATURE_TABLE.iter().flat_map(|m| {
        m.functions
            .iter()
            .map(move |f| format!("{}.{}", m.module, f.name))
    })
}

const P: ParamKind = ParamKind::PositionalOrKeyword;
const K: ParamKind = ParamKind::KeywordOnly;
const VK: ParamKind = ParamKind::VarKeyword;

macro_rules! sig {
    ($name:literal: $($param:literal $kind:ident),* $(,)?) => {
        FunctionSignature {
            name: $name,
            params: &[$(($param, $kind)),*],
        }
    };
}

pub const SIGNATURE_TABLE: &[ModuleSignatures] = &[
    ModuleSignatures {
        module: "hypothesis",
        functions: &[
            sig!("target": "observation" P, "label" K),
            sig!("find": "specifier" P, "condition" P, "settings" K, "random" K, "database_key" K),
        ],
    },
    ModuleSignatures {
        module: "hypothesis.extra.lark",
        functions: &[sig!("from_lark": "grammar" P, "start" K, "explicit" K)],
    },
    ModuleSignatures {
        module: "hypothesis.extra.numpy",
        functions: &[
            sig!("arrays": "dtype" P, "shape" P, "elements" K, "fill" K, "unique" K),
            sig!("array_shapes": "min_dims" K, "max_dims" K, "min_side" K, "max_side" K),
            sig!("unsigned_integer_dtypes": "endianness" K, "sizes" K),
            sig!("integer_dtypes": "endianness" K, "sizes" K),
            sig!("floating_dtypes": "endianness" K, "sizes" K),
            sig!("complex_number_dtypes": "endianness" K, "sizes" K),
            sig!("datetime64_dtypes": "max_period" K, "min_period" K, "endianness" K),
            sig!("timedelta64_dtypes": "max_period" K, "min_period" K, "endianness" K),
            sig!("byte_string_dtypes": "endianness" K, "min_len" K, "max_len" K),
            sig!("unicode_string_dtypes": "endianness" K, "min_len" K, "max_len" K),
            sig!("array_dtypes": "subtype_strategy" P, "min_size" K, "max_size" K, "allow_subarrays" K),
            sig!("nested_dtypes": "subtype_strategy" P, "max_leaves" K, "max_itemsize" K),
            sig!("valid_tuple_axes": "ndim" P, "min_size" K, "max_size" K),
            sig!("broadcastable_shapes": "shape" P, "min_dims" K, "max_dims" K, "min_side" K, "max_side" K),
        ],
    },
    ModuleSignatures {
        module: "hypothesis.extra.pandas",
        functions: &[
            sig!("indexes": "elements" K, "dtype" K, "min_size" K, "max_size" K, "unique" K),
            sig!("series": "elements" K, "dtype" K, "index" K, "fill" K, "unique" K),
            sig!("columns": "names_or_number" P, "dtype" K, "elements" K, "fill" K, "unique" K),
            sig!("data_frames": "columns" P, "rows" K, "index" K),
        ],
    },
    ModuleSignatures {
        module: "hypothesis.provisional",
        functions: &[sig!("domains": "max_length" K, "max_element_length" K)],
    },
    ModuleSignatures {
        module: "hypothesis.stateful",
        functions: &[
            sig!("run_state_machine_as_test": "state_machine_factory" P, "settings" K),
            sig!("rule": "targets" K, "target" K, "kwargs" VK),
            sig!("initialize": "targets" K, "target" K, "kwargs" VK),
        ],
    },
    ModuleSignatures {
        module: "hypothesis.strategies",
        functions: &[
            sig!("floats":
                "min_value" P, "max_value" P, "allow_nan" K, "allow_infinity" K,
                "allow_subnormal" K, "width" K, "exclude_min" K, "exclude_max" K),
            sig!("lists": "elements" P, "min_size" K, "max_size" K, "unique_by" K, "unique" K),
            sig!("sets": "elements" P, "min_size" K, "max_size" K),
            sig!("frozensets": "elements" P, "min_size" K, "max_size" K),
            sig!("iterables": "elements" P, "min_size" K, "max_size" K, "unique_by" K, "unique" K),
            sig!("dictionaries": "keys" P, "values" P, "dict_class" K, "min_size" K, "max_size" K),
            sig!("characters":
                "whitelist_categories" K, "blacklist_categories" K, "blacklist_characters" K,
                "min_codepoint" K, "max_codepoint" K, "whitelist_characters" K),
            sig!("text": "alphabet" P, "min_size" K, "max_size" K),
            sig!("from_regex": "regex" P, "fullmatch" K),
            sig!("binary": "min_size" K, "max_size" K),
            sig!("fractions": "min_value" P, "max_value" P, "max_denominator" K),
            sig!("decimals":
                "min_value" P, "max_value" P, "allow_nan" K, "allow_infinity" K, "places" K),
            sig!("recursive": "base" P, "extend" P, "max_leaves" K),
            sig!("complex_numbers":
                "min_magnitude" K, "max_magnitude" K, "allow_infinity" K, "allow_nan" K),
            sig!("shared": "base" P, "key" K),
            sig!("uuids": "version" K),
            sig!("runner": "default" K),
            sig!("functions": "like" K, "returns" K, "pure" K),
            sig!("datetimes":
                "min_value" P, "max_value" P, "timezones" K, "allow_imaginary" K),
            sig!("times": "min_value" P, "max_value" P, "timezones" K),
        ],
    },
];
