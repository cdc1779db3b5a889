//! Instruction prompts, one per gateway operation.

pub const NO_TRANSLATION_NEEDED: &str = "NO_TRANSLATION_NEEDED";

pub fn translate(text: &str, target_language: &str) -> String {
    format!(
        "Translate the following text to {lang}. If the text is already in {lang}, respond with \
         \"{sentinel}\". Only return the translation or \"{sentinel}\", nothing else:\n\n{text}",
        lang = target_language,
        sentinel = NO_TRANSLATION_NEEDED,
        text = text,
    )
}

pub fn extract_and_translate(target_language: &str) -> String {
    format!(
        "Analyze this image and extract any text you see. Then translate it to {lang}. If the text \
         is already in {lang}, respond with \"{sentinel}\". Format the response as JSON with \
         \"originalText\" and \"translation\" fields. Return only the JSON object.",
        lang = target_language,
        sentinel = NO_TRANSLATION_NEEDED,
    )
}

pub fn water_safety(country: &str) -> String {
    format!(
        "As a travel expert, provide information about water safety in {country}. Include whether \
         tap water is generally safe to drink and specific tips for water safety. Format your \
         response as JSON with these keys: safe (boolean), tips (array of strings), description \
         (string explaining the general water situation). Be specific and accurate about the \
         current water safety situation in {country}. Return only the JSON object.",
        country = country,
    )
}

pub fn travel_plan(location: &str, duration: &str, interests: &[String]) -> String {
    let focus = if interests.is_empty() {
        "general sightseeing".to_string()
    } else {
        interests.join(", ")
    };
    format!(
        "As a travel expert, create a comprehensive travel plan for {location} for {duration}, \
         focusing on these interests: {focus}. Include activities, safety tips, local customs, and \
         transportation advice. Format the response as JSON with these keys: activities (array), \
         safetyTips (array), localCustoms (array), transportationTips (array). Return only the \
         JSON object.",
    )
}

pub fn analyze_itinerary(itinerary: &str) -> String {
    format!(
        "As a travel expert, analyze this travel itinerary and provide suggestions for improvement, \
         considering timing, logistics, and local attractions. Format your response in a clear, \
         concise way:\n\n{}",
        itinerary
    )
}
