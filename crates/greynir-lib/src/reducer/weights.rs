//! Pass 2's tuning constants (§4.6, §9 "Open question"). Kept as named
//! constants rather than inlined into the scoring pass so the weights
//! can be re-tuned against a new corpus without touching the algorithm.

pub const ADVERB_PENALTY: i32 = -1;

pub const NOUN_SINGULAR_BONUS: i32 = 1;
pub const NOUN_ABBREV_PENALTY: i32 = -1;

pub const PREP_NOMINATIVE_PENALTY: i32 = -4;
pub const PREP_OTHER_BONUS: i32 = 2;

pub const VERB_ARITY_FACTOR: i32 = 2;
pub const VERB_ARITY0_UNSUPPORTED_PENALTY: i32 = -4;

pub const VERB_SAGNB_BONUS: i32 = 4;
pub const VERB_LH_BONUS: i32 = 3;
pub const VERB_LH_VB_PENALTY: i32 = -2;
pub const VERB_SUBJ_CASED_BONUS: i32 = 1;
pub const VERB_SUBJ_NONE_PENALTY: i32 = -3;
pub const VERB_NH_AFTER_NHM_BONUS: i32 = 4;
pub const NHM_BEFORE_NH_BONUS: i32 = 2;
pub const VERB_NH_NO_EF_FT_ALTERNATIVE_BONUS: i32 = 4;

pub const NUMERAL_TALA_PENALTY: i32 = -1;
pub const NUMERAL_GENITIVE_ALTERNATIVE_PENALTY: i32 = -1;

pub const SERNAFN_NO_READINGS_BONUS: i32 = 4;

pub const LITERAL_BONUS: i32 = 1;

/// Preference-pair multipliers (§4.6 pass 2 item 1).
pub const PREFERENCE_WORSE_FACTOR: i32 = -2;
pub const PREFERENCE_BETTER_FACTOR: i32 = 4;
pub const PREFERENCE_BETTER_LITERAL_FACTOR: i32 = 6;
