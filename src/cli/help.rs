use std::fmt::Write;

#[derive(Debug, Clone)]
struct OptionGuide {
    flag: &'static str,
    description: &'static str,
}

const OPTIONS: &[OptionGuide] = &[
    OptionGuide {
        flag: "--in1=<path>",
        description: "Source assembly. Public types declared here are not forwarded.",
    },
    OptionGuide {
        flag: "--in2=<path>",
        description: "Target assembly. Public types missing from --in1 are forwarded.",
    },
    OptionGuide {
        flag: "--out=<path>",
        description: "Output file for the generated directives (replaced on every run).",
    },
    OptionGuide {
        flag: "--log-format=<format>",
        description: "Diagnostic log format on stderr (auto, text, json).",
    },
    OptionGuide {
        flag: "--log-level=<level>",
        description: "Diagnostic log level (error, warn, info, debug, trace).",
    },
    OptionGuide {
        flag: "-h, -?, --help",
        description: "Display this help.",
    },
];

const EXAMPLES: &[&str] = &[
    "typeforwarder --in1=old/Contracts.dll --in2=new/Contracts.Core.dll --out=Forwarders.cs",
    "typeforwarder -in1 A.dll -in2 B.dll -out TypeForwarders.g.cs",
];

pub(crate) const SUMMARY: &str =
    "Generate type forwarders for types that are present in 'in2' but missing in 'in1'";

pub(crate) fn render_usage() -> String {
    let mut out = String::new();
    out.push_str("Usage: typeforwarder <options>\n");
    for option in OPTIONS {
        let _ = writeln!(out, "  {:24} {}", option.flag, option.description);
    }
    out.push('\n');
    out.push_str("EXAMPLES:\n");
    for example in EXAMPLES {
        let _ = writeln!(out, "  {example}");
    }
    out.push('\n');
    out.push_str(SUMMARY);
    out.push('\n');
    out
}
