/// Slug generation for task URLs
///
/// Tasks are addressed publicly by slug, never by numeric id. A slug is
/// derived from the task title (`slugify`), falls back to a placeholder for
/// titles that normalize to nothing, and is made unique against the `tasks`
/// relation by appending an incrementing numeric suffix (`-1`, `-2`, …).
///
/// The availability check here is advisory: two concurrent writers can both
/// observe a candidate as free before either inserts. The UNIQUE constraint
/// on `tasks.slug` is the authoritative arbiter; the save path in
/// [`crate::models::task::Task::create`] regenerates and retries exactly
/// once when it loses that race.
///
/// # Example
///
/// ```
/// use tasknest_shared::slug::slugify;
///
/// assert_eq!(slugify("Buy milk"), "buy-milk");
/// assert_eq!(slugify("Crème brûlée!"), "creme-brulee");
/// assert_eq!(slugify("???"), "");
/// ```

use sqlx::PgPool;

/// Placeholder token used when a title normalizes to an empty slug.
pub const FALLBACK_TOKEN: &str = "task";

/// Longest base slug we will derive; leaves headroom for numeric suffixes
/// within the 255-character column.
const MAX_BASE_LEN: usize = 200;

/// Normalizes a title into a URL-safe lowercase token sequence.
///
/// Common Latin diacritics are folded to ASCII, every other character
/// outside `[a-z0-9]` becomes a separator, and separator runs collapse to a
/// single hyphen with none leading or trailing. Titles with no sluggable
/// characters produce an empty string; callers fall back to
/// [`fallback_slug`].
///
/// # Example
///
/// ```
/// use tasknest_shared::slug::slugify;
///
/// assert_eq!(slugify("Hello  World"), "hello-world");
/// assert_eq!(slugify("Déjà vu #2"), "deja-vu-2");
/// assert_eq!(slugify("--Already--Slugged--"), "already-slugged");
/// ```
pub fn slugify(input: &str) -> String {
    let mut folded = String::with_capacity(input.len());
    for ch in input.to_lowercase().chars() {
        match fold_diacritic(ch) {
            Some(ascii) => folded.push_str(ascii),
            None => folded.push(ch),
        }
    }

    folded
        .chars()
        .map(|ch| match ch {
            'a'..='z' | '0'..='9' => ch,
            _ => '-',
        })
        .collect::<String>()
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Deterministic placeholder slug for unsluggable titles.
///
/// Incorporates the entity's id when one exists (`task-7`); a bare
/// [`FALLBACK_TOKEN`] otherwise (the create path has no id yet — the store
/// assigns it on insert).
pub fn fallback_slug(existing_id: Option<i64>) -> String {
    match existing_id {
        Some(id) => format!("{}-{}", FALLBACK_TOKEN, id),
        None => FALLBACK_TOKEN.to_string(),
    }
}

/// Derives a slug from `title` that no other task currently holds.
///
/// `existing_id` excludes the entity's own row from the availability check
/// (update path); pass `None` when creating. The returned candidate is the
/// base slug when free, otherwise the first free `base-N` with N counting
/// up from 1.
///
/// Not race-free: a concurrent writer can claim the returned slug before
/// the caller inserts. The caller's insert must treat a uniqueness
/// violation as a lost race and regenerate.
///
/// # Errors
///
/// Returns any database error from the availability query.
///
/// # Example
///
/// ```no_run
/// use tasknest_shared::slug::generate_unique_slug;
/// # use sqlx::PgPool;
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let slug = generate_unique_slug(&pool, "Buy milk", None).await?;
/// assert!(slug.starts_with("buy-milk"));
/// # Ok(())
/// # }
/// ```
pub async fn generate_unique_slug(
    pool: &PgPool,
    title: &str,
    existing_id: Option<i64>,
) -> Result<String, sqlx::Error> {
    let mut base = slugify(title);
    if base.is_empty() {
        base = fallback_slug(existing_id);
    }
    if base.len() > MAX_BASE_LEN {
        base.truncate(MAX_BASE_LEN);
        base = base.trim_end_matches('-').to_string();
    }

    let mut candidate = base.clone();
    let mut counter = 1u32;
    while slug_taken(pool, &candidate, existing_id).await? {
        candidate = format!("{}-{}", base, counter);
        counter += 1;
    }

    Ok(candidate)
}

/// Checks whether a slug is already held by a task other than `existing_id`.
async fn slug_taken(
    pool: &PgPool,
    slug: &str,
    existing_id: Option<i64>,
) -> Result<bool, sqlx::Error> {
    let taken: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM tasks
            WHERE slug = $1 AND ($2::BIGINT IS NULL OR id <> $2)
        )
        "#,
    )
    .bind(slug)
    .bind(existing_id)
    .fetch_one(pool)
    .await?;

    Ok(taken)
}

/// Folds a lowercase Latin character with a diacritic to its ASCII base.
///
/// Covers the Latin-1 supplement plus the handful of Latin Extended-A
/// characters that show up in real task titles. Anything unmapped passes
/// through and is treated as a separator by `slugify`.
fn fold_diacritic(ch: char) -> Option<&'static str> {
    let folded = match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'ç' | 'ć' | 'č' => "c",
        'ď' | 'đ' | 'ð' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' => "e",
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'į' => "i",
        'ł' => "l",
        'ñ' | 'ń' | 'ň' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' => "o",
        'ŕ' | 'ř' => "r",
        'ś' | 'š' => "s",
        'ť' => "t",
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' => "u",
        'ý' | 'ÿ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        'æ' => "ae",
        'œ' => "oe",
        'ß' => "ss",
        'þ' => "th",
        _ => return None,
    };
    Some(folded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Buy milk"), "buy-milk");
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("Test 123"), "test-123");
    }

    #[test]
    fn test_slugify_collapses_separators() {
        assert_eq!(slugify("Hello   World"), "hello-world");
        assert_eq!(slugify("hello---world"), "hello-world");
        assert_eq!(slugify("  padded  "), "padded");
        assert_eq!(slugify("Special!@#Characters"), "special-characters");
    }

    #[test]
    fn test_slugify_folds_diacritics() {
        assert_eq!(slugify("Crème brûlée"), "creme-brulee");
        assert_eq!(slugify("Señor Müller"), "senor-muller");
        assert_eq!(slugify("Straße"), "strasse");
        assert_eq!(slugify("Œuvre"), "oeuvre");
    }

    #[test]
    fn test_slugify_uppercase_diacritics() {
        // to_lowercase runs before folding, so uppercase forms fold too.
        assert_eq!(slugify("ÉCLAIR"), "eclair");
        assert_eq!(slugify("ÅNGSTRÖM"), "angstrom");
    }

    #[test]
    fn test_slugify_unsluggable_is_empty() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("???"), "");
        assert_eq!(slugify("   "), "");
        assert_eq!(slugify("世界"), "");
    }

    #[test]
    fn test_fallback_slug_with_id() {
        assert_eq!(fallback_slug(Some(7)), "task-7");
        assert_eq!(fallback_slug(Some(7)), fallback_slug(Some(7)));
    }

    #[test]
    fn test_fallback_slug_without_id() {
        assert_eq!(fallback_slug(None), "task");
    }

    #[test]
    fn test_slugify_output_is_url_safe() {
        let slug = slugify("A wild mix: CAFÉ, naïve & 100% done!");
        assert!(!slug.is_empty());
        assert!(slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        assert!(!slug.starts_with('-'));
        assert!(!slug.ends_with('-'));
    }

    // Uniqueness behavior against live data is covered by the
    // task_store_tests integration suite.
}
