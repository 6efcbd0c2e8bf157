//! Parameter groups - static display classification of measurement columns

use serde::Serialize;

/// Group assigned to parameters that are not listed in any group
pub const OTHER_GROUP: &str = "Other";

/// A named group of parameters
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ParameterGroup {
    /// Display name
    pub name: &'static str,

    /// Member parameter names
    pub parameters: &'static [&'static str],
}

const BUILTIN_GROUPS: &[ParameterGroup] = &[
    ParameterGroup {
        name: "Basic Information",
        parameters: &["M_C", "Jumbo_ID", "Track", "KIT", "Quality", "SUBSTANCE"],
    },
    ParameterGroup {
        name: "Physical Properties",
        parameters: &["CALIPER", "BULK", "GSM_2SIGMA_ABB", "CALIPER_CD_2SIGMA_ABB"],
    },
    ParameterGroup {
        name: "Surface Properties",
        parameters: &[
            "COBB_TS",
            "COBB_WS",
            "COBB_FL_3MIN",
            "COBB_WS_3MIN",
            "GLOSS_AT_75_TS",
            "ROUGHNESS_PPS_TS",
        ],
    },
    ParameterGroup {
        name: "Optical Properties",
        parameters: &[
            "BRIGHTNESS_ISO_TS",
            "BRIGHTNESS_ISO_BS",
            "WHITENESS_TS",
            "L_VALUE_TS",
            "a_VALUE_TS",
            "b_VALUE_TS",
            "L_VALUE_BS",
            "a_VALUE_BS",
            "b_VALUE_BS",
            "DELTA_E_TS",
        ],
    },
    ParameterGroup {
        name: "Mechanical Properties",
        parameters: &[
            "STIFFNESS_L_W_MD",
            "STIFFNESS_L_W_CD",
            "STIFFNESS_L_W_GM",
            "STIFFNESS_RATIO",
            "PLYBOND",
        ],
    },
    ParameterGroup {
        name: "Chemical Properties",
        parameters: &[
            "MOISTURE",
            "MOISTURE_2SIGMA_ABB",
            "ASH_TOP_LAYER",
            "ASH_BOTTOM_LAYER",
        ],
    },
    ParameterGroup {
        name: "Performance Indicators",
        parameters: &[
            "IGT_PICK_TOP_MED_VIS",
            "IGT_PICK_BOT_MED_VIS",
            "TL_GSM",
            "BL_GSM",
            "GSM_2SIGMA_CD_ABB",
        ],
    },
];

/// Ordered set of parameter groups
#[derive(Debug, Clone, Copy)]
pub struct ParameterGroups {
    groups: &'static [ParameterGroup],
}

impl ParameterGroups {
    /// The built-in grouping of jumbo roll measurements
    pub const fn builtin() -> Self {
        Self {
            groups: BUILTIN_GROUPS,
        }
    }

    /// All groups in display order
    pub fn all(&self) -> &'static [ParameterGroup] {
        self.groups
    }

    /// Display group of a parameter, [`OTHER_GROUP`] when unlisted
    pub fn group_of(&self, parameter: &str) -> &'static str {
        self.groups
            .iter()
            .find(|g| g.parameters.contains(&parameter))
            .map(|g| g.name)
            .unwrap_or(OTHER_GROUP)
    }

    /// Position of a group in display order (unlisted groups sort last)
    pub fn order_of(&self, group: &str) -> usize {
        self.groups
            .iter()
            .position(|g| g.name == group)
            .unwrap_or(self.groups.len())
    }
}

impl Default for ParameterGroups {
    fn default() -> Self {
        Self::builtin()
    }
}
