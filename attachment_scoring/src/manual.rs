/*!

This is the long-form manual for `attachment_scoring` and `commscore`.

## The questionnaire

The instrument has 15 core questions (items), answered on a Likert-type scale,
and three auxiliary scales (sections A, B and C). The answers are collected
with an online form and exported as a spreadsheet: one row per respondent,
with the answers in fixed columns.

| block      | columns (Excel) | zero-based   | names                         |
|------------|-----------------|--------------|-------------------------------|
| items      | O..AC           | `[14, 29)`   | `item_1` .. `item_15`         |
| section A  | AD..AK          | `[29, 37)`   | `sectionA_1` .. `sectionA_8`  |
| section B  | AL..AS          | `[37, 45)`   | `sectionB_1` .. `sectionB_8`  |
| section C  | AT..BE          | `[45, 57)`   | `sectionC_1` .. `sectionC_12` |

The columns before O (timestamp, demographic questions) are ignored. A
table narrower than 57 columns is rejected with the exact missing range. Other
layouts can be described in the configuration file (see below), they are
validated before use.

## Cleaning

Form answers often carry their label: `3. some difficulties`. Only the first
run of digits of a cell is kept. A cell without digits is a missing answer.
There is no decimal handling: `3.5` reads as 3.

## Scores

Each item belongs to one communication style:

* secure: items 1, 3, 7, 10, 15
* avoidant: items 2, 4, 8, 12, 13
* ambivalent: items 5, 6, 9, 11, 14

The score of a style is the sum of its items. Each section is scored by the
sum of its answers. Missing answers do not count. Sums stop at the largest
32-bit value (4294967295) instead of wrapping, so absurd answers such as
`4000000000` cannot turn a high score into a low one.

The respondent is classified with the style of highest score. Ties are
resolved in the order secure, avoidant, ambivalent: a tie between secure and
any other style is secure, a tie between avoidant and ambivalent is avoidant.

### Missing value policy

* `exclude` (default): a style whose items are all missing scores 0, and the
  respondent is classified as usual.
* `require`: a respondent with a style whose items are all missing is not
  classified. It still appears in the output, with its scores, but it is left
  out of the distribution and of the statistics per style.

## Summary

For each style present in the data:

* the number and percentage of respondents (percentages of the classified
  respondents)
* for each item: mean, sample standard deviation and number of answers
* for each section: mean, sample standard deviation and number of
  respondents, computed on the section totals

A mean is reported as `null` when there is no value, a standard deviation
when there are fewer than two values.

## Input formats

* `csv` Comma Separated Values, the first line being the header
* `xlsx` Excel workbook. The worksheet must be named with `excelWorksheetName`
  when the workbook has more than one.
* `json` the values of a sheet, either as an array of rows or as an object
  with a `values` field (the shape returned by the Google Sheets API)

Rows shorter than the header are padded with empty cells.

## Configuration file

```json
{
  "outputSettings": {
    "surveyName": "Communication styles 2024",
    "surveyDate": "2024-03-01",
    "outputFile": "summary.json"
  },
  "dataSources": [
    {
      "provider": "csv",
      "filePath": "answers.csv",
      "idColumnIndex": "B"
    }
  ],
  "rules": {
    "missingValuePolicy": "exclude",
    "labels": {
      "secure": "Secure communication",
      "avoidant": "Avoidant communication",
      "ambivalent": "Anxious-ambivalent communication"
    }
  }
}
```

Column indexes are either 1-based numbers or Excel column letters. File paths
are relative to the configuration file. A custom layout is given with a
`schema` object:

```json
"schema": {
  "version": "short-form",
  "sections": [
    { "name": "items", "prefix": "item", "firstColumn": "C", "width": 15, "items": true },
    { "name": "stress", "prefix": "stress", "firstColumn": "R", "width": 6 }
  ]
}
```

*/
