//! Static thinking scripts
//!
//! One script per prompt category: an ordered list of step templates and the
//! final answer shown once every step has completed. The table is constant
//! for the life of the process.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse intent of a user prompt, used to pick a thinking script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptCategory {
    Glucose,
    Diet,
    Exercise,
    Medication,
    General,
}

impl PromptCategory {
    pub const ALL: [PromptCategory; 5] = [
        PromptCategory::Glucose,
        PromptCategory::Diet,
        PromptCategory::Exercise,
        PromptCategory::Medication,
        PromptCategory::General,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PromptCategory::Glucose => "glucose",
            PromptCategory::Diet => "diet",
            PromptCategory::Exercise => "exercise",
            PromptCategory::Medication => "medication",
            PromptCategory::General => "general",
        }
    }
}

impl fmt::Display for PromptCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Template for a single reasoning step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepTemplate {
    pub id: &'static str,
    /// What the step is "doing", shown while it runs
    pub content: &'static str,
    /// Preliminary finding revealed once the step completes
    pub response: &'static str,
}

/// Ordered steps and final answer for one category
#[derive(Debug, PartialEq, Eq)]
pub struct Script {
    pub category: PromptCategory,
    pub steps: &'static [StepTemplate],
    pub final_response: &'static str,
}

impl Script {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Look up the script for a category
pub fn script(category: PromptCategory) -> &'static Script {
    match category {
        PromptCategory::Glucose => &GLUCOSE,
        PromptCategory::Diet => &DIET,
        PromptCategory::Exercise => &EXERCISE,
        PromptCategory::Medication => &MEDICATION,
        PromptCategory::General => &GENERAL,
    }
}

const fn step(id: &'static str, content: &'static str, response: &'static str) -> StepTemplate {
    StepTemplate {
        id,
        content,
        response,
    }
}

// ============================================================================
// Glucose
// ============================================================================

static GLUCOSE: Script = Script {
    category: PromptCategory::Glucose,
    steps: &[
        step(
            "1",
            "Agent Selection: Health Analyst Agent activated for glucose pattern analysis",
            "Selecting Health Analyst Agent as the most appropriate for analyzing glucose patterns and fluctuations.",
        ),
        step(
            "2",
            "Retrieving recent glucose readings from the past 7 days...",
            "Found 23 glucose readings from the past week. Average: 142 mg/dL, Highest: 210 mg/dL, Lowest: 87 mg/dL.",
        ),
        step(
            "3",
            "Analyzing time-of-day patterns in glucose fluctuations...",
            "Identified consistent post-lunch glucose spikes between 2-3pm, with readings averaging 178 mg/dL.",
        ),
        step(
            "4",
            "Examining correlation between logged meals and glucose spikes...",
            "High-carbohydrate lunches (>60g carbs) correlate with 83% of afternoon glucose spikes above 170 mg/dL.",
        ),
        step(
            "5",
            "Checking medication adherence impact on glucose stability...",
            "Medication adherence is 94% consistent. No significant correlation found between missed doses and glucose spikes.",
        ),
        step(
            "6",
            "Retrieving exercise data from Fitbit integration...",
            "Exercise data shows moderate activity 3 days/week. Post-exercise glucose readings are 15-20 mg/dL lower on average.",
        ),
        step(
            "7",
            "Identifying potential triggers for glucose variations...",
            "Primary trigger identified: high-carbohydrate lunch meals, particularly those containing refined grains and sugars.",
        ),
        step(
            "8",
            "Formulating personalized glucose management recommendations...",
            "Recommendations: 1) Increase protein intake at lunch, 2) Add 10-minute post-lunch walk, 3) Distribute carbs more evenly throughout the day.",
        ),
    ],
    final_response: "Based on your glucose data from the past week, I've noticed your readings tend to spike between 2-3pm, often after lunch. Your average glucose is 142 mg/dL, with highs reaching 210 mg/dL. The data suggests your afternoon meals may contain more carbs than optimal. Consider adding more protein to your lunch and taking a short 10-minute walk afterward, which has shown to reduce your post-meal glucose by 15-20 mg/dL based on your historical patterns.",
};

// ============================================================================
// Diet
// ============================================================================

static DIET: Script = Script {
    category: PromptCategory::Diet,
    steps: &[
        step(
            "1",
            "Agent Selection: Nutritionist Agent activated for dietary analysis",
            "Activating Nutritionist Agent to analyze food logs and provide dietary recommendations.",
        ),
        step(
            "2",
            "Analyzing recent food log entries...",
            "Analyzed 18 food log entries from the past week. Average daily intake: 2100 calories, 340g carbs, 70g protein, 65g fat.",
        ),
        step(
            "3",
            "Calculating average carbohydrate intake per meal...",
            "Carbohydrate distribution: Breakfast 25%, Lunch 40%, Dinner 30%, Snacks 5%. Lunch has highest carb concentration.",
        ),
        step(
            "4",
            "Examining meal timing patterns...",
            "Meals are consistently timed. Breakfast 7-8am, Lunch 12-1pm, Dinner 6-7pm. No significant late-night eating detected.",
        ),
        step(
            "5",
            "Reviewing glycemic impact of commonly consumed foods...",
            "High glycemic foods frequently consumed: white rice (4x/week), white bread (5x/week), sweetened beverages (3x/week).",
        ),
        step(
            "6",
            "Checking nutritional balance across logged meals...",
            "Nutritional gaps identified: fiber intake below target (15g vs. 25g recommended), vegetable servings low (2 vs. 5 recommended).",
        ),
        step(
            "7",
            "Comparing intake against personalized dietary goals...",
            "Current macronutrient ratio (65% carbs, 15% protein, 20% fat) differs from recommended diabetes ratio (45% carbs, 25% protein, 30% fat).",
        ),
        step(
            "8",
            "Developing targeted meal suggestions based on findings...",
            "Meal suggestions: Replace white rice with brown rice/quinoa, increase vegetable portions, add lean proteins like fish or tofu to meals.",
        ),
    ],
    final_response: "After analyzing your food logs, I see you're consuming about 65% of your daily calories from carbohydrates, which is higher than the recommended 45-50% for your diabetes management plan. Your vegetable intake averages 2 servings daily, below the target of 5 servings. I recommend increasing fiber-rich vegetables and replacing some rice portions with protein sources like bangus (milkfish) or tofu to help stabilize your glucose levels throughout the day.",
};

// ============================================================================
// Exercise
// ============================================================================

static EXERCISE: Script = Script {
    category: PromptCategory::Exercise,
    steps: &[
        step(
            "1",
            "Agent Selection: Exercise Coach Agent activated for activity analysis",
            "Selecting Exercise Coach Agent to develop a personalized workout plan based on fitness level and preferences.",
        ),
        step(
            "2",
            "Analyzing exercise patterns from manual logs and Fitbit...",
            "Current exercise pattern: 3 days/week, primarily evening walks (20-25 minutes) and occasional strength training (15 minutes).",
        ),
        step(
            "3",
            "Calculating weekly activity minutes against targets...",
            "Current: 75 minutes/week. Target for diabetes management: 150 minutes/week. Currently achieving 50% of recommended activity.",
        ),
        step(
            "4",
            "Examining impact of exercise on glucose readings...",
            "Evening walks reduce glucose by average of 18% when performed before dinner. Morning exercise shows minimal data points.",
        ),
        step(
            "5",
            "Checking for optimal exercise timing patterns...",
            "Optimal timing identified: 5-6pm exercise shows most significant glucose benefits. Morning schedule has availability for additional sessions.",
        ),
        step(
            "6",
            "Reviewing exercise intensity and duration...",
            "Current intensity: primarily low-moderate (average heart rate 110 BPM). Duration consistent but below recommendations.",
        ),
        step(
            "7",
            "Assessing cardiovascular metrics during activity...",
            "Cardiovascular response healthy: heart rate recovery within normal range, no concerning patterns detected in Fitbit data.",
        ),
        step(
            "8",
            "Formulating personalized exercise recommendations...",
            "Recommendations: Add two 15-minute morning walks (Tue/Thu), maintain evening walks (Mon/Wed/Fri), gradually increase duration to 30 minutes.",
        ),
    ],
    final_response: "Your activity data shows you're averaging 22 minutes of exercise 3 days per week, primarily in the evenings. When you exercise before dinner (between 5-6pm), your evening glucose readings improve by about 18%. I've noticed you enjoy walking and occasional swimming based on your logs. For optimal glucose management, I recommend adding two 15-minute morning walks to your routine, which aligns with both your preference for walking and your goal of more consistent glucose levels throughout the day.",
};

// ============================================================================
// Medication
// ============================================================================

static MEDICATION: Script = Script {
    category: PromptCategory::Medication,
    steps: &[
        step(
            "1",
            "Agent Selection: Medical Information Agent activated for medication analysis",
            "Activating Medical Information Agent to analyze medication adherence and optimize medication schedule.",
        ),
        step(
            "2",
            "Retrieving medication logs from the past 30 days...",
            "Retrieved 87 medication logs. Current regimen: Metformin 1000mg twice daily, meal-time insulin with variable dosing.",
        ),
        step(
            "3",
            "Analyzing adherence patterns for prescribed medications...",
            "Metformin adherence: 92% (morning dose: 96%, evening dose: 88%). Insulin adherence: 85% with timing variations.",
        ),
        step(
            "4",
            "Checking timing consistency for insulin administration...",
            "Insulin timing issue identified: average 23-minute delay between meals and insulin administration in 65% of instances.",
        ),
        step(
            "5",
            "Examining correlation between medication and glucose stability...",
            "Delayed insulin administration correlates with 30% higher post-meal glucose peaks compared to properly timed doses.",
        ),
        step(
            "6",
            "Reviewing potential medication interactions...",
            "No concerning medication interactions found in current regimen. All medications compatible with each other.",
        ),
        step(
            "7",
            "Comparing dosage patterns against prescription guidelines...",
            "Current dosing aligns with prescription. Insulin dose calculation appears appropriate based on carbohydrate intake.",
        ),
        step(
            "8",
            "Preparing medication management insights...",
            "Key insight: Evening medication adherence and insulin timing are primary areas for improvement. Calendar reminders could address both issues.",
        ),
    ],
    final_response: "Your medication logs show you've taken your Metformin consistently (92% adherence), but your meal-time insulin is often delayed by 20+ minutes after eating (happening in 65% of instances). This timing gap may explain the post-meal glucose spikes we're seeing. I recommend setting an additional reminder through your Google Calendar that triggers immediately when you log a meal to help maintain the proper timing between eating and insulin administration.",
};

// ============================================================================
// General
// ============================================================================

static GENERAL: Script = Script {
    category: PromptCategory::General,
    steps: &[
        step(
            "1",
            "Agent Selection: Determining optimal agent for query analysis...",
            "Query analysis complete. Utilizing multiple agents with Health Analyst as primary coordinator for comprehensive response.",
        ),
        step(
            "2",
            "Processing query and identifying relevant health domains...",
            "Relevant domains identified: glucose management, medication adherence, sleep patterns, and overall diabetes management strategy.",
        ),
        step(
            "3",
            "Retrieving user profile and historical health context...",
            "Profile retrieved: 42-year-old with Type 2 diabetes (diagnosed 3 years ago), A1C: 7.2%, target range: 80-150 mg/dL.",
        ),
        step(
            "4",
            "Analyzing recent health metrics across glucose, diet, activity...",
            "Health metrics summary: Average glucose 142 mg/dL, 65% in target range, 3 days/week exercise, 92% medication adherence.",
        ),
        step(
            "5",
            "Examining patterns and correlations in health data...",
            "Key correlation: Sleep quality significantly impacts next-day glucose levels. 7+ hours sleep results in 15% better glucose control.",
        ),
        step(
            "6",
            "Checking adherence to personalized health goals...",
            "Goal progress: Glucose monitoring (excellent), medication adherence (good), physical activity (needs improvement), diet (needs improvement).",
        ),
        step(
            "7",
            "Reviewing relevant medical guidelines and best practices...",
            "Applied ADA guidelines for Type 2 diabetes management: target A1C <7%, 150+ minutes weekly exercise, balanced macronutrient intake.",
        ),
        step(
            "8",
            "Formulating comprehensive health insights and recommendations...",
            "Holistic recommendations: Redistribute carbs throughout day, add brief post-meal activity, improve sleep hygiene, maintain medication schedule.",
        ),
    ],
    final_response: "Looking at your overall diabetes management, you're doing well with consistent glucose monitoring (average 5 checks daily) and medication adherence. Your greatest opportunity is in meal composition and timing\u{2014}particularly your carbohydrate distribution throughout the day. Your Fitbit data shows excellent sleep patterns (7.2 hours average), which positively impacts your morning glucose levels. Based on your comprehensive data, focusing on better balancing your lunch carbohydrates and adding brief activity after meals would likely have the most significant impact on your glucose stability.",
};
