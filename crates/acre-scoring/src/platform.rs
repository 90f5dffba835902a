//! Per-platform scorers.
//!
//! Each scorer splits 100 points into fixed sub-budgets and clamps every sub-budget on its
//! own before summing, so one outsized signal (say 50k stars) cannot spill into another.

use acre_core::records::filled;
use acre_core::{
    AssessmentResult, CandidateBundle, CodeforcesProfile, EducationLevel, GithubProfile,
    JobRequirements, LeetcodeProfile, LinkedinProfile, Platform, PlatformRecord, ResumeAnalysis,
};

/// Returned for resume and assessment when nothing is known: unknown is not bad.
pub const NEUTRAL_SCORE: f64 = 50.0;

/// Rating that earns the full rating budget (legendary grandmaster territory).
const CODEFORCES_RATING_CEILING: f64 = 3500.0;

/// Score one platform of a bundle. Missing data degrades to 0 or [`NEUTRAL_SCORE`].
pub fn score_platform(bundle: &CandidateBundle, platform: Platform, job: &JobRequirements) -> f64 {
    match platform {
        Platform::Codeforces => codeforces(&bundle.codeforces, job),
        Platform::Leetcode => leetcode(&bundle.leetcode, job),
        Platform::Github => github(&bundle.github, job),
        Platform::Linkedin => linkedin(&bundle.linkedin, job),
        Platform::Resume => resume(&bundle.resume, job),
        Platform::Assessment => assessment(&bundle.assessment, job),
    }
}

fn budget(value: f64, cap: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, cap)
    } else {
        0.0
    }
}

fn ratio_points(count: f64, full_at: f64, cap: f64) -> f64 {
    if full_at <= 0.0 {
        return 0.0;
    }
    budget(count / full_at * cap, cap)
}

fn lower_all<'a>(items: impl IntoIterator<Item = &'a String>) -> Vec<String> {
    items.into_iter().map(|s| s.to_lowercase()).collect()
}

fn keyword_hits<'a>(keywords: impl IntoIterator<Item = &'a String>, text_lower: &str) -> usize {
    keywords
        .into_iter()
        .filter(|k| text_lower.contains(&k.to_lowercase()))
        .count()
}

fn member_hits<'a>(wanted: impl IntoIterator<Item = &'a String>, have_lower: &[String]) -> usize {
    wanted
        .into_iter()
        .filter(|w| have_lower.contains(&w.to_lowercase()))
        .count()
}

/// Rating 40, contests 30, rank tier 20, contribution 10.
pub fn codeforces(record: &PlatformRecord<CodeforcesProfile>, _job: &JobRequirements) -> f64 {
    let Some(cf) = record.usable() else {
        return 0.0;
    };

    let rating = ratio_points(cf.rating.unwrap_or(0.0), CODEFORCES_RATING_CEILING, 40.0);
    let contests = ratio_points(cf.contests_participated.unwrap_or(0.0), 100.0, 30.0);
    let tier = cf.rank.as_deref().map(codeforces_rank_points).unwrap_or(0.0);
    let contribution = budget(cf.contribution.unwrap_or(0.0) / 10.0, 10.0);

    (rating + contests + tier + contribution).min(100.0)
}

fn codeforces_rank_points(rank: &str) -> f64 {
    match rank.trim().to_lowercase().as_str() {
        "legendary grandmaster" => 20.0,
        "international grandmaster" => 18.0,
        "grandmaster" => 16.0,
        "international master" => 14.0,
        "master" => 12.0,
        "candidate master" => 10.0,
        "expert" => 8.0,
        "specialist" => 6.0,
        "pupil" => 4.0,
        "newbie" => 2.0,
        _ => 0.0,
    }
}

/// Solved 50, difficulty mix 30, acceptance 10, global ranking 10.
pub fn leetcode(record: &PlatformRecord<LeetcodeProfile>, _job: &JobRequirements) -> f64 {
    let Some(lc) = record.usable() else {
        return 0.0;
    };

    let solved = ratio_points(lc.total_solved.unwrap_or(0.0), 500.0, 50.0);

    let easy = lc.easy_solved.unwrap_or(0.0);
    let medium = lc.medium_solved.unwrap_or(0.0);
    let hard = lc.hard_solved.unwrap_or(0.0);
    let difficulty = (easy + medium * 2.0 + hard * 3.0) / 6.0;
    let mix = ratio_points(difficulty, 200.0, 30.0);

    let acceptance = ratio_points(lc.acceptance_rate.unwrap_or(0.0), 100.0, 10.0);

    // Lower is better. A reported 0 is the unranked placeholder, not first place, and scores
    // like an absent ranking.
    let ranking = match lc.ranking {
        Some(r) if r > 0.0 && r < 100_000.0 => 10.0,
        Some(r) if r > 0.0 && r < 500_000.0 => 7.0,
        Some(r) if r > 0.0 && r < 1_000_000.0 => 5.0,
        Some(r) if r > 0.0 && r < 2_000_000.0 => 3.0,
        _ => 0.0,
    };

    (solved + mix + acceptance + ranking).min(100.0)
}

/// Stars sub-budget (max 25). Non-decreasing in `stars`.
pub fn star_points(stars: f64) -> f64 {
    if stars >= 1000.0 {
        25.0
    } else if stars >= 500.0 {
        22.0
    } else if stars >= 100.0 {
        18.0
    } else if stars >= 50.0 {
        14.0
    } else if stars >= 10.0 {
        10.0
    } else if stars >= 1.0 {
        5.0
    } else {
        0.0
    }
}

/// Repos 15, stars 25, followers 10, languages 20 (diversity 10 + required skills 10),
/// project quality 15, domain relevance 15.
pub fn github(record: &PlatformRecord<GithubProfile>, job: &JobRequirements) -> f64 {
    let Some(gh) = record.usable() else {
        return 0.0;
    };

    let repos = ratio_points(gh.public_repos.unwrap_or(0.0), 50.0, 15.0);
    let stars = star_points(gh.total_stars_earned.unwrap_or(0.0));
    let followers = ratio_points(gh.followers.unwrap_or(0.0), 100.0, 10.0);

    let languages: Vec<String> = gh
        .top_languages
        .iter()
        .map(|l| l.name().to_lowercase())
        .collect();
    let diversity = ratio_points(languages.len() as f64, 5.0, 10.0);
    let skill_match = if job.required_skills.is_empty() {
        0.0
    } else {
        let hits = member_hits(&job.required_skills, &languages);
        ratio_points(hits as f64, job.required_skills.len() as f64, 10.0)
    };

    let top = &gh.top_repositories;
    let quality = if top.is_empty() {
        0.0
    } else {
        let good = top
            .iter()
            .filter(|r| filled(&r.description) && (r.stars.unwrap_or(0.0) > 0.0 || !r.topics.is_empty()))
            .count();
        ratio_points(good as f64, top.len() as f64, 15.0)
    };

    let domain = if job.domain_keywords.is_empty() {
        0.0
    } else {
        let per_repo: f64 = top
            .iter()
            .map(|repo| {
                let text = format!(
                    "{} {} {}",
                    repo.name.as_deref().unwrap_or_default(),
                    repo.description.as_deref().unwrap_or_default(),
                    repo.topics.join(" ")
                )
                .to_lowercase();
                let hits = keyword_hits(&job.domain_keywords, &text);
                (hits as f64 * 2.0).min(5.0)
            })
            .sum();
        budget(per_repo, 15.0)
    };

    (repos + stars + followers + diversity + skill_match + quality + domain).min(100.0)
}

/// Highest degree named in free text, matched on whole words so "systems" is not a master's.
fn degree_level(text: &str) -> Option<EducationLevel> {
    let cleaned = text.to_lowercase().replace('.', "");
    let words: Vec<&str> = cleaned
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    let any = |options: &[&str]| {
        words
            .iter()
            .any(|w| options.iter().any(|o| w == o || (o.len() > 4 && w.starts_with(o))))
    };

    if any(&["phd", "doctorate"]) {
        Some(EducationLevel::Phd)
    } else if any(&["master", "msc", "ms", "mtech", "mba"]) {
        Some(EducationLevel::Master)
    } else if any(&["bachelor", "bsc", "bs", "btech", "be"]) {
        Some(EducationLevel::Bachelor)
    } else {
        None
    }
}

fn connection_points(connections: Option<&str>) -> f64 {
    let text = connections.unwrap_or("0");
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return 0.0;
    }
    // Digit runs past u64 still mean a very large network.
    let count = digits.parse::<u64>().unwrap_or(u64::MAX);
    match count {
        c if c >= 500 => 10.0,
        c if c >= 200 => 8.0,
        c if c >= 100 => 6.0,
        c if c >= 50 => 4.0,
        _ => 2.0,
    }
}

/// Completeness 25, experience 20 (+5 domain), education 25, network 10, skills 20.
pub fn linkedin(record: &PlatformRecord<LinkedinProfile>, job: &JobRequirements) -> f64 {
    let Some(li) = record.usable() else {
        return 0.0;
    };

    let mut completeness = 0.0;
    if filled(&li.full_name) {
        completeness += 4.0;
    }
    if filled(&li.headline) {
        completeness += 5.0;
    }
    if filled(&li.summary) {
        completeness += 5.0;
    }
    if filled(&li.location) {
        completeness += 3.0;
    }
    if filled(&li.profile_pic_url) {
        completeness += 3.0;
    }
    if !li.experiences.is_empty() {
        completeness += 5.0;
    }

    let mut experience = 0.0;
    if !li.experiences.is_empty() {
        let valid = li
            .experiences
            .iter()
            .filter(|e| filled(&e.company) && filled(&e.title))
            .count();
        experience += ratio_points(valid as f64, 3.0, 20.0);

        if !job.domain_keywords.is_empty() {
            let text = li
                .experiences
                .iter()
                .map(|e| {
                    format!(
                        "{} {}",
                        e.title.as_deref().unwrap_or_default(),
                        e.description.as_deref().unwrap_or_default()
                    )
                })
                .collect::<Vec<_>>()
                .join(" ")
                .to_lowercase();
            let hits = keyword_hits(&job.domain_keywords, &text);
            experience += (hits as f64 * 2.0).min(5.0);
        }
    }

    let mut education = 0.0;
    if !li.education.is_empty() {
        let valid = li.education.iter().filter(|e| filled(&e.school)).count();
        education += ratio_points(valid as f64, 2.0, 15.0);

        let text = li
            .education
            .iter()
            .map(|e| {
                format!(
                    "{} {}",
                    e.degree.as_deref().unwrap_or_default(),
                    e.field_of_study.as_deref().unwrap_or_default()
                )
            })
            .collect::<Vec<_>>()
            .join(" ");
        education += match degree_level(&text) {
            Some(EducationLevel::Phd) => 10.0,
            Some(EducationLevel::Master) => 7.0,
            Some(EducationLevel::Bachelor) => 4.0,
            _ => 0.0,
        };
    }

    let network = connection_points(li.connections.as_deref());

    let skills_lower = lower_all(&li.skills);
    let mut skills = ratio_points(li.skills.len() as f64, 10.0, 10.0);
    let wanted: Vec<&String> = job
        .required_skills
        .union(&job.domain_keywords)
        .collect();
    if !wanted.is_empty() {
        let hits = member_hits(wanted.iter().copied(), &skills_lower);
        skills += ratio_points(hits as f64, wanted.len() as f64, 10.0);
    }

    (completeness + experience + education + network + skills).min(100.0)
}

fn education_points(level: Option<EducationLevel>) -> f64 {
    match level {
        Some(EducationLevel::Phd) => 30.0,
        Some(EducationLevel::Master) => 22.0,
        Some(EducationLevel::Bachelor) => 15.0,
        Some(EducationLevel::HighSchool) => 5.0,
        None => 0.0,
    }
}

/// Education 30, experience 25, skills 25, domain 10, certifications and projects 10.
pub fn resume(record: &PlatformRecord<ResumeAnalysis>, job: &JobRequirements) -> f64 {
    let Some(resume) = record.usable() else {
        return NEUTRAL_SCORE;
    };

    // The analyzer already scored against these requirements.
    if let Some(score) = resume.score {
        if !job.required_skills.is_empty() {
            return budget(score, 100.0);
        }
    }

    let level = resume.education();
    let mut education = education_points(level);
    if matches!(level, Some(l) if l < job.min_education) {
        education -= 10.0;
    }

    let years = resume.total_experience_years.unwrap_or(0.0).max(0.0);
    let experience = if years >= job.min_experience_years {
        if years >= 10.0 {
            25.0
        } else if years >= 5.0 {
            22.0
        } else if years >= 3.0 {
            18.0
        } else if years >= 1.0 {
            15.0
        } else {
            12.0
        }
    } else {
        budget(years * 3.0, 10.0)
    };

    let skills_lower = lower_all(&resume.technical_skills);
    let skill_count = ratio_points(resume.technical_skills.len() as f64, 10.0, 10.0);
    let required = if job.required_skills.is_empty() {
        7.5
    } else {
        let hits = member_hits(&job.required_skills, &skills_lower);
        ratio_points(hits as f64, job.required_skills.len() as f64, 15.0)
    };

    let domain = if job.domain_keywords.is_empty() {
        5.0
    } else {
        let text = [
            resume.technical_skills.join(" "),
            resume.projects.join(" "),
            resume.certifications.join(" "),
        ]
        .join(" ")
        .to_lowercase();
        let hits = keyword_hits(&job.domain_keywords, &text);
        ratio_points(hits as f64, job.domain_keywords.len() as f64, 10.0)
    };

    let certifications = budget(resume.certifications.len() as f64 * 1.5, 5.0);
    let projects = budget(resume.projects.len() as f64, 5.0);

    budget(
        education + experience + skill_count + required + domain + certifications + projects,
        100.0,
    )
}

/// First present of `percentage_score`, `score`, `points_earned / total_points`.
pub fn assessment(record: &PlatformRecord<AssessmentResult>, _job: &JobRequirements) -> f64 {
    let Some(result) = record.usable() else {
        return NEUTRAL_SCORE;
    };

    if let Some(percentage) = result.percentage_score {
        return budget(percentage, 100.0);
    }
    if let Some(score) = result.score {
        return budget(score, 100.0);
    }
    match (result.points_earned, result.total_points) {
        (Some(earned), Some(total)) if total > 0.0 => budget(earned / total * 100.0, 100.0),
        _ => NEUTRAL_SCORE,
    }
}
