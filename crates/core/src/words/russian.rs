//! Russian cardinals with grammatical gender and plural agreement.

pub(super) const CONNECTOR: &str = "точка";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gender {
    Masculine,
    Feminine,
}

const UNITS: [&str; 10] =
    ["", "один", "два", "три", "четыре", "пять", "шесть", "семь", "восемь", "девять"];

const TEENS: [&str; 10] = [
    "десять",
    "одиннадцать",
    "двенадцать",
    "тринадцать",
    "четырнадцать",
    "пятнадцать",
    "шестнадцать",
    "семнадцать",
    "восемнадцать",
    "девятнадцать",
];

const TENS: [&str; 10] = [
    "",
    "",
    "двадцать",
    "тридцать",
    "сорок",
    "пятьдесят",
    "шестьдесят",
    "семьдесят",
    "восемьдесят",
    "девяносто",
];

const HUNDREDS: [&str; 10] = [
    "",
    "сто",
    "двести",
    "триста",
    "четыреста",
    "пятьсот",
    "шестьсот",
    "семьсот",
    "восемьсот",
    "девятьсот",
];

/// Scale words in (one, few, many) forms with the gender they govern.
const SCALES: [(Gender, [&str; 3]); 7] = [
    (Gender::Masculine, ["", "", ""]),
    (Gender::Feminine, ["тысяча", "тысячи", "тысяч"]),
    (Gender::Masculine, ["миллион", "миллиона", "миллионов"]),
    (Gender::Masculine, ["миллиард", "миллиарда", "миллиардов"]),
    (Gender::Masculine, ["триллион", "триллиона", "триллионов"]),
    (Gender::Masculine, ["квадриллион", "квадриллиона", "квадриллионов"]),
    (Gender::Masculine, ["квинтиллион", "квинтиллиона", "квинтиллионов"]),
];

/// Stems of decimal-fraction denominators, indexed by digit count - 1.
const FRACTION_STEMS: [&str; 9] = [
    "десят",
    "сот",
    "тысячн",
    "десятитысячн",
    "стотысячн",
    "миллионн",
    "десятимиллионн",
    "стомиллионн",
    "миллиардн",
];

pub(super) fn cardinal(n: u64) -> String {
    cardinal_with(n, Gender::Masculine)
}

/// "сорок пять целых семьдесят восемь сотых". `None` when the fraction has
/// more digits than there are denominator words.
pub(super) fn decimal(whole: u64, fraction: &str) -> Option<String> {
    let stem = FRACTION_STEMS.get(fraction.len().checked_sub(1)?)?;
    let numerator: u64 = fraction.parse().ok()?;

    let whole_noun = if plural_form(whole) == 0 { "целая" } else { "целых" };
    let fraction_ending = if plural_form(numerator) == 0 { "ая" } else { "ых" };

    Some(format!(
        "{} {whole_noun} {} {stem}{fraction_ending}",
        cardinal_with(whole, Gender::Feminine),
        cardinal_with(numerator, Gender::Feminine),
    ))
}

fn cardinal_with(n: u64, gender: Gender) -> String {
    if n == 0 {
        return "ноль".to_string();
    }

    let mut chunks: Vec<Vec<&'static str>> = Vec::new();
    let mut rest = n;
    let mut scale = 0;
    while rest > 0 {
        let chunk = rest % 1000;
        if chunk != 0 {
            let (scale_gender, forms) = SCALES[scale];
            let chunk_gender = if scale == 0 { gender } else { scale_gender };
            let mut words = below_thousand(chunk as usize, chunk_gender);
            if scale > 0 {
                words.push(forms[plural_form(chunk)]);
            }
            chunks.push(words);
        }
        rest /= 1000;
        scale += 1;
    }

    chunks.reverse();
    chunks.concat().join(" ")
}

fn below_thousand(n: usize, gender: Gender) -> Vec<&'static str> {
    let mut words = Vec::new();
    if n >= 100 {
        words.push(HUNDREDS[n / 100]);
    }

    let rest = n % 100;
    match rest {
        0 => {}
        10..=19 => words.push(TEENS[rest - 10]),
        _ => {
            if rest >= 20 {
                words.push(TENS[rest / 10]);
            }
            let unit = rest % 10;
            if unit != 0 {
                words.push(unit_word(unit, gender));
            }
        }
    }
    words
}

fn unit_word(unit: usize, gender: Gender) -> &'static str {
    match (unit, gender) {
        (1, Gender::Feminine) => "одна",
        (2, Gender::Feminine) => "две",
        _ => UNITS[unit],
    }
}

/// Index into (one, few, many) noun forms for `n`.
fn plural_form(n: u64) -> usize {
    let last = n % 10;
    let last_two = n % 100;
    if last == 1 && last_two != 11 {
        0
    } else if (2..=4).contains(&last) && !(12..=14).contains(&last_two) {
        1
    } else {
        2
    }
}
