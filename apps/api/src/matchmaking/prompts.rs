// All LLM prompt constants for the Matchmaking module.

/// Fixed text substituted for the profile whenever generation fails or the
/// model returns nothing. Deliberately NOT appended to the session history:
/// it is not a profile the model needs to avoid repeating.
pub const FALLBACK_PROFILE: &str =
    "Sorry for the inconvenience. We could not generate match details.";

/// Matchmaker prompt template. Replace `{name}`, `{age}`, `{gender}`,
/// `{partner_gender}`, `{preferences}`, and `{avoid_section}` before
/// sending. `{avoid_section}` is empty for a fresh session.
pub const MATCH_PROMPT_TEMPLATE: &str = r#"You are a professional matchmaker. A user has shared the following details and partner preferences:

Name: {name}
Age: {age}
Gender: {gender}
Partner preferences: {preferences}

Generate the details of ONE suitable partner matching the user's stated preferences. The user's gender is {gender}, so the partner MUST be {partner_gender}. Every response must introduce a completely NEW person: never repeat a name, age, education, profession, location, languages, or hobbies used before.

Your answer must consist of ONLY the partner's details, in exactly this format:

Name: [Partner's Name]
Age: [Partner's Age]
Education: [Partner's Education]
Profession: [Partner's Profession]
Location: [Partner's City]
Languages: [Languages spoken]
Hobbies: [Hobbies list]
Marital status: Single
[2 lines describing the partner's qualities, tailored to the user's preferences. Keep the wording simple.]{avoid_section}"#;

/// Opens the avoid-list block appended when the session already holds
/// generated profiles.
pub const AVOID_SECTION_HEADER: &str =
    "\n\nPreviously generated profiles (DO NOT REPEAT ANY OF THESE):\n";

/// Closes the avoid-list block.
pub const AVOID_SECTION_FOOTER: &str =
    "\nEnsure the new profile is COMPLETELY different from these.";
