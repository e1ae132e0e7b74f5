//! Offline keyword-matching responder.
//!
//! Used when no backend is available (`--mock`). Matching is ordered and the
//! first matching group wins, so a message naming several symptoms gets the
//! earliest-listed group's reply; cough is deliberately tested before fever.

struct KeywordGroup {
    keywords: &'static [&'static str],
    reply: &'static str,
}

const KEYWORD_GROUPS: &[KeywordGroup] = &[
    KeywordGroup {
        keywords: &["cough", "coughing"],
        reply: COUGH_REPLY,
    },
    KeywordGroup {
        keywords: &["headache", "migraine", "head hurts"],
        reply: HEADACHE_REPLY,
    },
    KeywordGroup {
        keywords: &["fever", "feverish", "high temperature"],
        reply: FEVER_REPLY,
    },
    KeywordGroup {
        keywords: &["sore throat", "throat hurts", "painful to swallow"],
        reply: SORE_THROAT_REPLY,
    },
    KeywordGroup {
        keywords: &["nausea", "nauseous", "vomit", "throwing up"],
        reply: NAUSEA_REPLY,
    },
    KeywordGroup {
        keywords: &["fatigue", "tired", "exhausted", "no energy"],
        reply: FATIGUE_REPLY,
    },
    KeywordGroup {
        keywords: &["dizzy", "dizziness", "lightheaded", "vertigo"],
        reply: DIZZINESS_REPLY,
    },
    KeywordGroup {
        keywords: &["stomach pain", "stomach ache", "abdominal pain", "belly"],
        reply: STOMACH_PAIN_REPLY,
    },
    KeywordGroup {
        keywords: &["back pain", "backache", "back hurts"],
        reply: BACK_PAIN_REPLY,
    },
    KeywordGroup {
        keywords: &["cold", "runny nose", "sneez", "congestion", "stuffy nose"],
        reply: COLD_REPLY,
    },
    KeywordGroup {
        keywords: &["joint pain", "joints hurt", "stiff joints", "arthritis"],
        reply: JOINT_PAIN_REPLY,
    },
    KeywordGroup {
        keywords: &["insomnia", "can't sleep", "cant sleep", "trouble sleeping"],
        reply: INSOMNIA_REPLY,
    },
    KeywordGroup {
        keywords: &["rash", "hives", "itchy skin", "skin irritation"],
        reply: RASH_REPLY,
    },
    KeywordGroup {
        keywords: &["chest pain", "chest tightness", "chest hurts"],
        reply: CHEST_PAIN_REPLY,
    },
    KeywordGroup {
        keywords: &["anxiety", "anxious", "panic attack", "stressed"],
        reply: ANXIETY_REPLY,
    },
];

/// Map free-text input to a canned advisory. Deterministic, no I/O.
pub fn respond(input: &str) -> String {
    let lowered = input.to_lowercase();
    for group in KEYWORD_GROUPS {
        if group.keywords.iter().any(|kw| lowered.contains(kw)) {
            return group.reply.to_string();
        }
    }
    GENERIC_REPLY.to_string()
}

const COUGH_REPLY: &str = "A cough is often your airways clearing out an irritant or infection.\n\nPossible causes:\n- Viral infections like a cold or flu\n- Post-nasal drip or allergies\n- Dry indoor air\n\nWhat you can do:\n- Stay hydrated and try warm drinks with honey\n- Use a humidifier at night\n- Avoid smoke and strong fumes\n\nSee a doctor if:\n- The cough lasts more than 3 weeks\n- You cough up blood or thick discolored phlegm\n- You have trouble breathing or chest pain\n\nIs your cough dry, or are you bringing anything up?";

const HEADACHE_REPLY: &str = "Headaches are very common and usually not serious.\n\nPossible causes:\n- Tension from stress or posture\n- Dehydration or skipped meals\n- Eye strain from screens\n- Migraine\n\nWhat you can do:\n- Drink water and rest in a quiet, dark room\n- Try an over-the-counter pain reliever\n- Take regular breaks from screens\n\nSee a doctor if:\n- The headache is sudden and severe\n- It comes with fever, stiff neck, confusion, or vision changes\n- Headaches become more frequent or intense\n\nHow long have you had the headache, and is it on one side or all over?";

const FEVER_REPLY: &str = "A fever is usually a sign your body is fighting an infection.\n\nPossible causes:\n- Viral infections like flu or a cold\n- Bacterial infections\n- Recent vaccination\n\nWhat you can do:\n- Rest and drink plenty of fluids\n- Use a fever reducer like paracetamol if uncomfortable\n- Keep the room cool and wear light clothing\n\nSee a doctor if:\n- Your temperature is above 39.4 C (103 F)\n- The fever lasts more than 3 days\n- You have a stiff neck, rash, or trouble breathing\n\nHave you measured your temperature, and do you have any other symptoms?";

const SORE_THROAT_REPLY: &str = "A sore throat is most often caused by a viral infection.\n\nPossible causes:\n- Cold or flu viruses\n- Strep throat (bacterial)\n- Dry air or allergies\n\nWhat you can do:\n- Gargle with warm salt water\n- Drink warm liquids and use throat lozenges\n- Rest your voice\n\nSee a doctor if:\n- The pain is severe or lasts more than a week\n- You have trouble swallowing or breathing\n- You have a high fever or white patches on your tonsils\n\nIs it painful to swallow, and do you also have a fever?";

const NAUSEA_REPLY: &str = "Nausea has many possible triggers, most of them short-lived.\n\nPossible causes:\n- Stomach bug or food poisoning\n- Motion sickness\n- Medication side effects\n- Early pregnancy\n\nWhat you can do:\n- Sip clear fluids slowly and eat bland foods\n- Avoid strong smells and fatty meals\n- Try ginger tea or ginger candies\n\nSee a doctor if:\n- Vomiting lasts more than 2 days\n- You see blood in vomit\n- You show signs of dehydration such as dark urine or dizziness\n\nWhen did the nausea start, and have you vomited?";

const FATIGUE_REPLY: &str = "Ongoing tiredness can come from lifestyle factors or underlying conditions.\n\nPossible causes:\n- Poor or short sleep\n- Stress or low mood\n- Anemia or thyroid issues\n- Recent infection\n\nWhat you can do:\n- Keep a regular sleep schedule\n- Get light exercise and daylight during the day\n- Limit caffeine and alcohol in the evening\n\nSee a doctor if:\n- Fatigue lasts more than 2 weeks despite rest\n- It comes with weight loss, fever, or shortness of breath\n\nHow long have you been feeling this way, and how is your sleep?";

const DIZZINESS_REPLY: &str = "Dizziness is usually brief and harmless, but it is worth tracking.\n\nPossible causes:\n- Dehydration or standing up too quickly\n- Inner ear issues like vertigo\n- Low blood sugar or low blood pressure\n\nWhat you can do:\n- Sit or lie down until it passes\n- Drink water and eat something if you skipped a meal\n- Move slowly when changing position\n\nSee a doctor if:\n- Dizziness is frequent or severe\n- It comes with chest pain, slurred speech, or weakness\n- You faint or nearly faint\n\nDoes the room feel like it is spinning, or do you feel faint?";

const STOMACH_PAIN_REPLY: &str = "Stomach pain is common and often settles on its own.\n\nPossible causes:\n- Indigestion or gas\n- Stomach bug\n- Food intolerance\n- Constipation\n\nWhat you can do:\n- Eat small, bland meals\n- Use a warm compress on your belly\n- Avoid alcohol, caffeine, and spicy food for now\n\nSee a doctor if:\n- The pain is severe or localized to the lower right side\n- It lasts more than a few days\n- You have blood in your stool or persistent vomiting\n\nWhere exactly is the pain, and is it constant or does it come in waves?";

const BACK_PAIN_REPLY: &str = "Most back pain comes from muscles and improves within a few weeks.\n\nPossible causes:\n- Muscle strain from lifting or posture\n- Long periods of sitting\n- Stress-related tension\n\nWhat you can do:\n- Keep gently moving; avoid strict bed rest\n- Alternate heat and cold on the sore area\n- Try an over-the-counter pain reliever\n\nSee a doctor if:\n- Pain radiates down a leg or causes numbness\n- It follows a fall or injury\n- You lose bladder or bowel control (urgent)\n\nDid the pain start after a specific activity or movement?";

const COLD_REPLY: &str = "That sounds like a common cold, which usually clears within a week or so.\n\nPossible causes:\n- Rhinovirus and other cold viruses\n\nWhat you can do:\n- Rest and drink plenty of fluids\n- Use saline spray or steam for congestion\n- Treat aches with an over-the-counter pain reliever\n\nSee a doctor if:\n- Symptoms last more than 10 days without improvement\n- You develop a high fever or ear pain\n- Breathing becomes difficult\n\nHow many days have you had symptoms, and do you have a fever as well?";

const JOINT_PAIN_REPLY: &str = "Joint pain can follow activity, or point to inflammation.\n\nPossible causes:\n- Overuse or minor injury\n- Osteoarthritis\n- Inflammatory conditions like rheumatoid arthritis\n\nWhat you can do:\n- Rest the joint and apply ice for new pain\n- Use gentle range-of-motion exercises\n- Try an anti-inflammatory pain reliever\n\nSee a doctor if:\n- The joint is hot, red, or very swollen\n- Pain persists beyond 2 weeks\n- You also have fever or unexplained weight loss\n\nWhich joints hurt, and is there any swelling or stiffness in the morning?";

const INSOMNIA_REPLY: &str = "Trouble sleeping is frustrating, and usually improves with routine changes.\n\nPossible causes:\n- Stress or racing thoughts\n- Caffeine, alcohol, or late screens\n- Irregular sleep schedule\n\nWhat you can do:\n- Keep consistent sleep and wake times\n- Avoid screens and caffeine in the evening\n- Keep the bedroom dark, quiet, and cool\n\nSee a doctor if:\n- Poor sleep persists more than a month\n- Daytime sleepiness affects your safety\n- You snore heavily or stop breathing during sleep\n\nHow long has this been going on, and what does your evening routine look like?";

const RASH_REPLY: &str = "Skin rashes have many causes, and most are not dangerous.\n\nPossible causes:\n- Contact with an irritant or allergen\n- Eczema or dry skin\n- Viral infections\n- Heat rash\n\nWhat you can do:\n- Avoid scratching and keep the area clean and dry\n- Use a fragrance-free moisturizer\n- Try an antihistamine if it itches\n\nSee a doctor if:\n- The rash spreads quickly or blisters\n- It comes with fever or facial swelling\n- It shows signs of infection like warmth and pus\n\nWhere is the rash, and did anything new touch your skin recently?";

const CHEST_PAIN_REPLY: &str = "Chest pain should always be taken seriously.\n\nPossible causes:\n- Muscle strain\n- Acid reflux\n- Anxiety\n- Heart or lung conditions\n\nWhat you can do:\n- Stop and rest right away\n- Note whether the pain changes with breathing or movement\n\nSeek urgent care now if:\n- The pain is crushing, or spreads to your arm, jaw, or back\n- You are short of breath, sweating, or nauseous\n- The pain lasts more than a few minutes\n\nIf any of those apply, please call emergency services immediately. Otherwise, can you describe when the pain started?";

const ANXIETY_REPLY: &str = "Anxiety is very common and very treatable.\n\nPossible causes:\n- Ongoing stress at work or home\n- Caffeine or poor sleep\n- Anxiety disorders\n\nWhat you can do:\n- Try slow breathing: in for 4 counts, out for 6\n- Get regular exercise and limit caffeine\n- Talk to someone you trust about how you feel\n\nSee a doctor if:\n- Anxiety interferes with daily life\n- You have panic attacks\n- You have thoughts of harming yourself (seek help right away)\n\nWhat situations tend to bring this feeling on for you?";

const GENERIC_REPLY: &str = "Thanks for sharing that with me.\n\nI couldn't match your symptoms to a specific pattern, but here is some general advice:\n- Rest and stay hydrated\n- Keep track of when symptoms started and how they change\n- Avoid strenuous activity until you feel better\n\nSee a doctor if:\n- Symptoms are severe, worsening, or last more than a few days\n- You develop a high fever or trouble breathing\n\nCould you tell me more about your main symptom, like where it is and when it started?";
